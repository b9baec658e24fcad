use crate::model::{Rgb, WHITE};

pub const DEFAULT_FLOAT_PRECISION: usize = 5;

/// Stands in for white to save five characters.
pub const WHITE_COLOR_CODE: &str = "1";

pub fn color_array_to_hex(color: Rgb) -> String {
    format!("{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Accepts six hex digits (optionally `#`-prefixed) or the white code `1`.
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let value = value.trim();
    if value == WHITE_COLOR_CODE {
        return Some(WHITE);
    }
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |start: usize| u8::from_str_radix(&digits[start..start + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Integral values print without a decimal point regardless of
/// `max_precision`; anything else is rounded to `max_precision` significant
/// digits and printed in its shortest form (`1.3999999999999999` -> `1.4`).
pub fn format_float(value: f64, max_precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{value}");
    }
    let digits = max_precision.max(1);
    let rounded = format!("{:.*e}", digits - 1, value)
        .parse::<f64>()
        .unwrap_or(value);
    format!("{rounded}")
}

pub fn format_default_float(value: f64) -> String {
    format_float(value, DEFAULT_FLOAT_PRECISION)
}

pub fn serialize_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

pub fn parse_bool(value: Option<&str>) -> Option<bool> {
    match value?.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// `None` for missing or unparseable input, never zero: the caller decides
/// the default.
pub fn parse_float(value: Option<&str>, min: f64, max: f64) -> Option<f64> {
    let parsed = value?.trim().parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(parsed.clamp(min, max))
}

/// Like [`parse_float`], truncating any fractional part.
pub fn parse_int(value: Option<&str>, min: i64, max: i64) -> Option<i64> {
    let trimmed = value?.trim();
    let parsed = match trimmed.parse::<i64>() {
        Ok(parsed) => parsed,
        Err(_) => {
            let float = trimmed.parse::<f64>().ok()?;
            if !float.is_finite() {
                return None;
            }
            float.trunc() as i64
        }
    };
    Some(parsed.clamp(min, max))
}

/// Exactly `count` comma-separated floats, each clamped into `[min, max]`.
pub fn parse_float_list(
    value: Option<&str>,
    count: usize,
    min: f64,
    max: f64,
) -> Option<Vec<f64>> {
    let parts = value?.split(',').collect::<Vec<_>>();
    if parts.len() != count {
        return None;
    }
    parts
        .into_iter()
        .map(|part| parse_float(Some(part), min, max))
        .collect()
}

pub fn join_floats(values: &[f64], separator: &str) -> String {
    values
        .iter()
        .map(|value| format_default_float(*value))
        .collect::<Vec<_>>()
        .join(separator)
}
