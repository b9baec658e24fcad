use std::collections::BTreeMap;
use std::sync::LazyLock;

use percent_encoding::{AsciiSet, utf8_percent_encode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::{ParseError, Url};

use super::key_value::URI_COMPONENT;
use super::Result;

/// Query values keep `:` and `,` readable; both are legal in a query string.
const QUERY_VALUE: &AsciiSet = &URI_COMPONENT.remove(b':').remove(b',');

static CHANNEL_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^c([0-9]+)$").expect("channel key pattern is valid"));

pub fn channel_key(index: usize) -> String {
    format!("c{index}")
}

/// Raw strings of the global viewer keys, one field per key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerStateParams {
    pub view: Option<String>,
    pub mode: Option<String>,
    pub mask: Option<String>,
    pub image: Option<String>,
    pub axes: Option<String>,
    pub bb: Option<String>,
    pub bbcol: Option<String>,
    pub bgcol: Option<String>,
    pub rot: Option<String>,
    pub bright: Option<String>,
    pub dens: Option<String>,
    pub lvl: Option<String>,
    pub interp: Option<String>,
    pub reg: Option<String>,
    pub slice: Option<String>,
    pub t: Option<String>,
    pub cam: Option<String>,
}

impl ViewerStateParams {
    pub const KEYS: [&'static str; 17] = [
        "view", "mode", "mask", "image", "axes", "bb", "bbcol", "bgcol", "rot", "bright", "dens",
        "lvl", "interp", "reg", "slice", "t", "cam",
    ];

    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "view" => &mut self.view,
            "mode" => &mut self.mode,
            "mask" => &mut self.mask,
            "image" => &mut self.image,
            "axes" => &mut self.axes,
            "bb" => &mut self.bb,
            "bbcol" => &mut self.bbcol,
            "bgcol" => &mut self.bgcol,
            "rot" => &mut self.rot,
            "bright" => &mut self.bright,
            "dens" => &mut self.dens,
            "lvl" => &mut self.lvl,
            "interp" => &mut self.interp,
            "reg" => &mut self.reg,
            "slice" => &mut self.slice,
            "t" => &mut self.t,
            "cam" => &mut self.cam,
            _ => return None,
        };
        Some(slot)
    }

    /// Stores `value` under `key`; returns `false` for keys this struct does not own.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        match self.slot(key) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "view" => &self.view,
            "mode" => &self.mode,
            "mask" => &self.mask,
            "image" => &self.image,
            "axes" => &self.axes,
            "bb" => &self.bb,
            "bbcol" => &self.bbcol,
            "bgcol" => &self.bgcol,
            "rot" => &self.rot,
            "bright" => &self.bright,
            "dens" => &self.dens,
            "lvl" => &self.lvl,
            "interp" => &self.interp,
            "reg" => &self.reg,
            "slice" => &self.slice,
            "t" => &self.t,
            "cam" => &self.cam,
            _ => return None,
        };
        value.as_deref()
    }

    /// Present keys, in table order.
    pub fn keys(&self) -> Vec<&'static str> {
        Self::KEYS
            .into_iter()
            .filter(|key| self.get(key).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

/// Deprecated global channel keys, honoured only without any `c{N}` key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyChannelParams {
    /// Comma-separated channel indices to enable.
    pub ch: Option<String>,
    /// Comma-separated `min,max` pairs, one pair per listed channel.
    pub luts: Option<String>,
    /// Comma-separated hex colors, one per listed channel.
    pub colors: Option<String>,
}

impl LegacyChannelParams {
    pub fn is_empty(&self) -> bool {
        self.ch.is_none() && self.luts.is_none() && self.colors.is_none()
    }
}

/// Typed view of a share-link query string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlParams {
    pub viewer: ViewerStateParams,
    /// `c{N}` blocks keyed by channel index.
    pub channels: BTreeMap<usize, String>,
    /// Data source list, as found in the query (each entry still encoded).
    pub url: Option<String>,
    pub dataset: Option<String>,
    pub id: Option<String>,
    pub legacy: LegacyChannelParams,
    /// Keys this crate does not interpret; carried so links survive a re-encode.
    pub extra: BTreeMap<String, String>,
}

impl UrlParams {
    /// Parses a query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = UrlParams::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.insert(&key, value.into_owned());
        }
        params
    }

    pub fn from_url(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim())?;
        Ok(url.query().map(Self::from_query).unwrap_or_default())
    }

    /// Accepts a full URL or a bare query string. Anything without a scheme
    /// is read as a query, even when its values hold URLs.
    pub fn from_url_or_query(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        match Url::parse(trimmed) {
            Ok(url) => Ok(url.query().map(Self::from_query).unwrap_or_default()),
            Err(ParseError::RelativeUrlWithoutBase) => Ok(Self::from_query(trimmed)),
            Err(error) => Err(error.into()),
        }
    }

    pub fn insert(&mut self, key: &str, value: String) {
        if self.viewer.set(key, value.clone()) {
            return;
        }
        match key {
            "url" => self.url = Some(value),
            "dataset" => self.dataset = Some(value),
            "id" => self.id = Some(value),
            "ch" => self.legacy.ch = Some(value),
            "luts" => self.legacy.luts = Some(value),
            "colors" => self.legacy.colors = Some(value),
            _ => {
                let index = CHANNEL_KEY_REGEX
                    .captures(key)
                    .and_then(|captures| captures[1].parse::<usize>().ok());
                match index {
                    Some(index) => {
                        self.channels.insert(index, value);
                    }
                    None => {
                        self.extra.insert(key.to_string(), value);
                    }
                }
            }
        }
    }

    /// Every present key with its value, in a stable order: data source,
    /// viewer keys, channels, catalog, legacy keys, then anything else.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(url) = &self.url {
            pairs.push(("url".to_string(), url.clone()));
        }
        for key in self.viewer.keys() {
            if let Some(value) = self.viewer.get(key) {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
        for (index, value) in &self.channels {
            pairs.push((channel_key(*index), value.clone()));
        }
        let optional = [
            ("dataset", &self.dataset),
            ("id", &self.id),
            ("ch", &self.legacy.ch),
            ("luts", &self.legacy.luts),
            ("colors", &self.legacy.colors),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.clone()));
            }
        }
        for (key, value) in &self.extra {
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }

    pub fn to_query(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(&key, QUERY_VALUE),
                    utf8_percent_encode(&value, QUERY_VALUE)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `base` with its query replaced by these parameters.
    pub fn to_url(&self, base: &str) -> Result<String> {
        let mut url = Url::parse(base.trim())?;
        let query = self.to_query();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        Ok(url.to_string())
    }
}
