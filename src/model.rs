mod camera;
mod channel;
mod color;
mod control_point;
mod error;
mod lut;
mod modes;
mod region;
mod viewer;


pub use camera::{
    CameraState, DEFAULT_FOV_DEGREES, DEFAULT_ORTHO_SCALE, PartialCameraState, Vec3,
};
pub use channel::{
    ChannelMatcher, ChannelPattern, ChannelState, DEFAULT_CHANNEL_COLORS, DEFAULT_VOLUMES_ENABLED,
    ISOVALUE_DEFAULT, ISOVALUE_MAX, ViewerChannelSetting, default_channel_color,
    default_channel_settings,
};
pub use color::{BLACK, Rgb, WHITE};
pub use control_point::{
    ControlPoint, DEFAULT_CONTROL_POINT_COLOR, TFEDITOR_MAX_BIN, control_points_to_ramp,
    is_canonical_ramp, ramp_to_control_points, sort_control_points,
};
pub use error::{ModelError, Result};
pub use lut::{LutBound, LutSetting};
pub use modes::{ImageType, RenderMode, ViewMode};
pub use region::{AxisRange, PartialRegion, PartialSlice, Region, Slice};
pub use viewer::{
    BACKGROUND_COLOR_DEFAULT, BOUNDING_BOX_COLOR_DEFAULT, BRIGHTNESS_DEFAULT, DENSITY_DEFAULT,
    LEVELS_DEFAULT, LEVELS_MAX, MASK_ALPHA_DEFAULT, PartialViewerState, SLIDER_MAX, ViewerState,
};
