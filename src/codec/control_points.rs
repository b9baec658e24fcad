use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::model::{ControlPoint, DEFAULT_CONTROL_POINT_COLOR, sort_control_points};

use super::format::{WHITE_COLOR_CODE, color_array_to_hex, format_default_float, parse_hex_color};

const POINT: &str = r"-?[0-9.]*:-?[0-9.]*:(?:[0-9a-fA-F]{6}|1)";

/// `x:opacity:color:x:opacity:color...`
static CONTROL_POINTS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{POINT}(?::{POINT})*$")).expect("control point pattern is valid")
});

/// Older links joined points with commas: `x:opacity:color,x:opacity:color`.
static LEGACY_CONTROL_POINTS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{POINT}(?:,{POINT})*$")).expect("legacy control point pattern is valid")
});

fn color_code(point: &ControlPoint) -> String {
    if point.color == DEFAULT_CONTROL_POINT_COLOR {
        WHITE_COLOR_CODE.to_string()
    } else {
        color_array_to_hex(point.color)
    }
}

pub fn serialize_control_points(points: &[ControlPoint]) -> String {
    points
        .iter()
        .map(|point| {
            format!(
                "{}:{}:{}",
                format_default_float(point.x),
                format_default_float(point.opacity),
                color_code(point)
            )
        })
        .collect::<Vec<_>>()
        .join(":")
}

/// Parses either control point format, sorted by `x`. An empty string is an
/// empty list. Returns `None` when the string matches neither format;
/// individual malformed numbers fall back to `x = 0` and `opacity = 1`.
pub fn parse_control_points(value: &str) -> Option<Vec<ControlPoint>> {
    let value = value.trim();
    if value.is_empty() {
        return Some(Vec::new());
    }
    let fields = if CONTROL_POINTS_REGEX.is_match(value) {
        value.split(':').collect::<Vec<_>>()
    } else if LEGACY_CONTROL_POINTS_REGEX.is_match(value) {
        value.split([',', ':']).collect::<Vec<_>>()
    } else {
        debug!("ignoring malformed control points `{value}`");
        return None;
    };

    let mut points = fields
        .chunks_exact(3)
        .map(|chunk| ControlPoint {
            x: chunk[0].parse::<f64>().unwrap_or(0.0),
            opacity: chunk[1].parse::<f64>().unwrap_or(1.0).clamp(0.0, 1.0),
            color: parse_hex_color(chunk[2]).unwrap_or(DEFAULT_CONTROL_POINT_COLOR),
        })
        .collect::<Vec<_>>();
    sort_control_points(&mut points);
    Some(points)
}
