mod channel;
mod control_points;
mod error;
mod format;
mod key_value;
mod legacy;
mod lut;
mod params;
mod share;
mod viewer;

#[cfg(test)]
mod tests;

pub use channel::{
    deserialize_channels, parse_channel_setting, serialize_channel_setting,
    serialize_channel_state,
};
pub use control_points::{parse_control_points, serialize_control_points};
pub use error::{CodecError, Result};
pub use format::{
    DEFAULT_FLOAT_PRECISION, WHITE_COLOR_CODE, color_array_to_hex, format_default_float,
    format_float, parse_bool, parse_float, parse_hex_color, parse_int, serialize_bool,
};
pub use key_value::{object_to_key_value_list, parse_key_value_list};
pub use legacy::parse_legacy_channels;
pub use lut::{parse_lut, serialize_lut};
pub use params::{LegacyChannelParams, UrlParams, ViewerStateParams, channel_key};
pub use share::{
    CatalogParams, ViewerUrlConfig, decode_data_urls, deserialize_url_params, encode_data_urls,
    serialize_viewer_url_params,
};
pub use viewer::{
    deserialize_viewer_state, parse_camera_state, parse_region, parse_slice,
    parse_url_view_mode, serialize_camera_state, serialize_region, serialize_slice,
    serialize_viewer_state, view_mode_to_url,
};

pub use crate::model::{control_points_to_ramp, ramp_to_control_points};
