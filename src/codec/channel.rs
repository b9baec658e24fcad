use crate::model::{ChannelMatcher, ChannelState, ISOVALUE_MAX, ViewerChannelSetting};

use super::UrlParams;
use super::control_points::{parse_control_points, serialize_control_points};
use super::format::{
    color_array_to_hex, format_default_float, join_floats, parse_bool, parse_float,
    parse_hex_color, serialize_bool,
};
use super::key_value::{object_to_key_value_list, parse_key_value_list};
use super::legacy::parse_legacy_channels;
use super::lut::{parse_lut, serialize_lut};

pub const COLOR: &str = "col";
pub const COLORIZE_ENABLED: &str = "clz";
pub const COLORIZE_ALPHA: &str = "cza";
pub const ISOSURFACE_OPACITY: &str = "isa";
pub const LUT: &str = "lut";
pub const RAMP: &str = "rmp";
pub const CONTROL_POINTS: &str = "cps";
pub const CONTROL_POINTS_ENABLED: &str = "cpe";
pub const VOLUME_ENABLED: &str = "ven";
pub const ISOSURFACE_ENABLED: &str = "sen";
pub const ISOVALUE: &str = "isv";

fn clear_if_equal<T: PartialEq>(value: &mut Option<T>, default: &T) {
    if value.as_ref() == Some(default) {
        *value = None;
    }
}

fn parse_ramp(value: Option<&str>) -> Option<[f64; 2]> {
    let (min, max) = value?.split_once(':')?;
    let min = parse_float(Some(min), f64::MIN, f64::MAX)?;
    let max = parse_float(Some(max), f64::MIN, f64::MAX)?;
    Some([min, max])
}

/// Decodes one `c{N}` block. Position, not name, decides which channel it
/// applies to.
pub fn parse_channel_setting(index: usize, value: &str) -> ViewerChannelSetting {
    let entries = parse_key_value_list(value);
    let get = |key: &str| entries.get(key).map(String::as_str);
    ViewerChannelSetting {
        matcher: ChannelMatcher::Index(index),
        volume_enabled: parse_bool(get(VOLUME_ENABLED)),
        isosurface_enabled: parse_bool(get(ISOSURFACE_ENABLED)),
        isovalue: parse_float(get(ISOVALUE), 0.0, ISOVALUE_MAX),
        opacity: parse_float(get(ISOSURFACE_OPACITY), 0.0, 1.0),
        color: get(COLOR).and_then(parse_hex_color),
        colorize_enabled: parse_bool(get(COLORIZE_ENABLED)),
        colorize_alpha: parse_float(get(COLORIZE_ALPHA), 0.0, 1.0),
        lut: get(LUT).and_then(parse_lut),
        ramp: parse_ramp(get(RAMP)),
        control_points: get(CONTROL_POINTS).and_then(parse_control_points),
        use_control_points: parse_bool(get(CONTROL_POINTS_ENABLED)),
    }
}

/// Encodes the specified fields of `setting`; its matcher is not encoded.
pub fn serialize_channel_setting(setting: &ViewerChannelSetting) -> String {
    let mut entries: Vec<(&str, String)> = Vec::new();
    if let Some(color) = setting.color {
        entries.push((COLOR, color_array_to_hex(color)));
    }
    if let Some(enabled) = setting.colorize_enabled {
        entries.push((COLORIZE_ENABLED, serialize_bool(enabled).to_string()));
    }
    if let Some(alpha) = setting.colorize_alpha {
        entries.push((COLORIZE_ALPHA, format_default_float(alpha)));
    }
    if let Some(opacity) = setting.opacity {
        entries.push((ISOSURFACE_OPACITY, format_default_float(opacity)));
    }
    if let Some(lut) = &setting.lut {
        entries.push((LUT, serialize_lut(lut)));
    }
    if let Some(ramp) = setting.ramp {
        entries.push((RAMP, join_floats(&ramp, ":")));
    }
    if let Some(points) = &setting.control_points {
        entries.push((CONTROL_POINTS, serialize_control_points(points)));
    }
    if let Some(enabled) = setting.use_control_points {
        entries.push((CONTROL_POINTS_ENABLED, serialize_bool(enabled).to_string()));
    }
    if let Some(enabled) = setting.volume_enabled {
        entries.push((VOLUME_ENABLED, serialize_bool(enabled).to_string()));
    }
    if let Some(enabled) = setting.isosurface_enabled {
        entries.push((ISOSURFACE_ENABLED, serialize_bool(enabled).to_string()));
    }
    if let Some(isovalue) = setting.isovalue {
        entries.push((ISOVALUE, format_default_float(isovalue)));
    }
    object_to_key_value_list(entries)
}

/// Encodes a live channel. With `remove_defaults`, fields equal to a fresh
/// channel at the same position are left out.
pub fn serialize_channel_state(
    index: usize,
    state: &ChannelState,
    remove_defaults: bool,
) -> String {
    let mut setting = state.to_setting(index);
    if remove_defaults {
        let defaults = ChannelState::new(state.name.clone(), index);
        clear_if_equal(&mut setting.volume_enabled, &defaults.volume_enabled);
        clear_if_equal(&mut setting.isosurface_enabled, &defaults.isosurface_enabled);
        clear_if_equal(&mut setting.isovalue, &defaults.isovalue);
        clear_if_equal(&mut setting.opacity, &defaults.opacity);
        clear_if_equal(&mut setting.color, &defaults.color);
        clear_if_equal(&mut setting.colorize_enabled, &defaults.colorize_enabled);
        clear_if_equal(&mut setting.colorize_alpha, &defaults.colorize_alpha);
        clear_if_equal(&mut setting.use_control_points, &defaults.use_control_points);
        clear_if_equal(&mut setting.ramp, &defaults.ramp);
        clear_if_equal(&mut setting.control_points, &defaults.control_points);
    }
    serialize_channel_setting(&setting)
}

/// Per-channel settings carried by `params`. `c{N}` keys take precedence;
/// the deprecated `ch`/`luts`/`colors` keys are read only without them.
pub fn deserialize_channels(params: &UrlParams) -> Vec<ViewerChannelSetting> {
    if !params.channels.is_empty() {
        return params
            .channels
            .iter()
            .map(|(index, value)| parse_channel_setting(*index, value))
            .collect();
    }
    if !params.legacy.is_empty() {
        return parse_legacy_channels(&params.legacy);
    }
    Vec::new()
}
