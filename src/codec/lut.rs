use log::debug;

use crate::model::{LutBound, LutSetting};

use super::format::format_default_float;

const AUTO_IJ: &str = "autoij";

pub(crate) fn parse_lut_bound(value: &str) -> Option<LutBound> {
    let value = value.trim();
    let number = |raw: &str| raw.parse::<f64>().ok().filter(|n| n.is_finite());
    if let Some(rest) = value.strip_prefix(['p', 'P']) {
        return number(rest).map(LutBound::Percentile);
    }
    if let Some(rest) = value.strip_prefix(['m', 'M']) {
        return number(rest).map(LutBound::Median);
    }
    number(value).map(LutBound::Absolute)
}

fn serialize_bound(bound: LutBound) -> String {
    match bound {
        LutBound::Absolute(value) => format_default_float(value),
        LutBound::Percentile(value) => format!("p{}", format_default_float(value)),
        LutBound::Median(value) => format!("m{}", format_default_float(value)),
    }
}

/// `autoij`, or `min:max` where each bound is a number, `p{n}` or `m{n}`.
pub fn parse_lut(value: &str) -> Option<LutSetting> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(AUTO_IJ) {
        return Some(LutSetting::AutoIJ);
    }
    let parsed = value.split_once(':').and_then(|(min, max)| {
        Some(LutSetting::Range {
            min: parse_lut_bound(min)?,
            max: parse_lut_bound(max)?,
        })
    });
    if parsed.is_none() {
        debug!("ignoring malformed lut `{value}`");
    }
    parsed
}

pub fn serialize_lut(lut: &LutSetting) -> String {
    match lut {
        LutSetting::AutoIJ => AUTO_IJ.to_string(),
        LutSetting::Range { min, max } => {
            format!("{}:{}", serialize_bound(*min), serialize_bound(*max))
        }
    }
}

