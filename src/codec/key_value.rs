use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters `encodeURIComponent` leaves alone.
pub(crate) const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const ENCODED_COLON: &str = "%3A";

pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

pub(crate) fn decode_component(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Encodes entries as `key:value,key:value`.
///
/// Colons inside values are left literal: nested encodings (camera vectors,
/// control points) use them heavily and the parser splits on the first colon
/// only.
pub fn object_to_key_value_list<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    entries
        .into_iter()
        .map(|(key, value)| {
            let value = encode_component(value.as_ref()).replace(ENCODED_COLON, ":");
            format!("{}:{}", encode_component(key.as_ref()), value)
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`object_to_key_value_list`]. Entries without a colon or with
/// an empty key are dropped.
pub fn parse_key_value_list(value: &str) -> BTreeMap<String, String> {
    value
        .split(',')
        .filter_map(|entry| {
            let (key, value) = entry.split_once(':')?;
            let key = decode_component(key).trim().to_string();
            if key.is_empty() {
                return None;
            }
            Some((key, decode_component(value).trim().to_string()))
        })
        .collect()
}
