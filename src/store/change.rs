use crate::model::{
    ControlPoint, ImageType, LutSetting, PartialCameraState, PartialRegion, PartialSlice,
    RenderMode, Rgb, ViewMode,
};

/// One update to the global viewer settings.
///
/// Scalar and array variants replace the field; `Region`, `Slice` and
/// `CameraState` carry partial values merged field by field.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerSettingChange {
    ViewMode(ViewMode),
    RenderMode(RenderMode),
    ImageType(ImageType),
    ShowAxes(bool),
    ShowBoundingBox(bool),
    BoundingBoxColor(Rgb),
    BackgroundColor(Rgb),
    Autorotate(bool),
    MaskAlpha(f64),
    Brightness(f64),
    Density(f64),
    Levels([f64; 3]),
    InterpolationEnabled(bool),
    Region(PartialRegion),
    Slice(PartialSlice),
    Time(u32),
    CameraState(PartialCameraState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerSettingKey {
    ViewMode,
    RenderMode,
    ImageType,
    ShowAxes,
    ShowBoundingBox,
    BoundingBoxColor,
    BackgroundColor,
    Autorotate,
    MaskAlpha,
    Brightness,
    Density,
    Levels,
    InterpolationEnabled,
    Region,
    Slice,
    Time,
    CameraState,
}

impl ViewerSettingChange {
    pub fn key(&self) -> ViewerSettingKey {
        match self {
            ViewerSettingChange::ViewMode(_) => ViewerSettingKey::ViewMode,
            ViewerSettingChange::RenderMode(_) => ViewerSettingKey::RenderMode,
            ViewerSettingChange::ImageType(_) => ViewerSettingKey::ImageType,
            ViewerSettingChange::ShowAxes(_) => ViewerSettingKey::ShowAxes,
            ViewerSettingChange::ShowBoundingBox(_) => ViewerSettingKey::ShowBoundingBox,
            ViewerSettingChange::BoundingBoxColor(_) => ViewerSettingKey::BoundingBoxColor,
            ViewerSettingChange::BackgroundColor(_) => ViewerSettingKey::BackgroundColor,
            ViewerSettingChange::Autorotate(_) => ViewerSettingKey::Autorotate,
            ViewerSettingChange::MaskAlpha(_) => ViewerSettingKey::MaskAlpha,
            ViewerSettingChange::Brightness(_) => ViewerSettingKey::Brightness,
            ViewerSettingChange::Density(_) => ViewerSettingKey::Density,
            ViewerSettingChange::Levels(_) => ViewerSettingKey::Levels,
            ViewerSettingChange::InterpolationEnabled(_) => ViewerSettingKey::InterpolationEnabled,
            ViewerSettingChange::Region(_) => ViewerSettingKey::Region,
            ViewerSettingChange::Slice(_) => ViewerSettingKey::Slice,
            ViewerSettingChange::Time(_) => ViewerSettingKey::Time,
            ViewerSettingChange::CameraState(_) => ViewerSettingKey::CameraState,
        }
    }
}

/// One update to a single channel. Every variant replaces its field; ramp and
/// control point edits also drop a pending `lut`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelSettingChange {
    VolumeEnabled(bool),
    IsosurfaceEnabled(bool),
    Isovalue(f64),
    Opacity(f64),
    Color(Rgb),
    ColorizeEnabled(bool),
    ColorizeAlpha(f64),
    UseControlPoints(bool),
    ControlPoints(Vec<ControlPoint>),
    Ramp([f64; 2]),
    Lut(Option<LutSetting>),
}
