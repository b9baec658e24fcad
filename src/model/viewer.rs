use serde::{Deserialize, Serialize};

use super::{
    BLACK, CameraState, ImageType, PartialCameraState, PartialRegion, PartialSlice, Region,
    RenderMode, Rgb, Slice, ViewMode, WHITE,
};

pub const MASK_ALPHA_DEFAULT: f64 = 50.0;
pub const BRIGHTNESS_DEFAULT: f64 = 70.0;
pub const DENSITY_DEFAULT: f64 = 50.0;
pub const LEVELS_DEFAULT: [f64; 3] = [35.0, 140.0, 255.0];
pub const BOUNDING_BOX_COLOR_DEFAULT: Rgb = WHITE;
pub const BACKGROUND_COLOR_DEFAULT: Rgb = BLACK;

/// Upper bound of the mask, brightness and density sliders.
pub const SLIDER_MAX: f64 = 100.0;
/// Upper bound of the gamma levels.
pub const LEVELS_MAX: f64 = 255.0;

/// Global settings shared by every channel of the loaded volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerState {
    pub view_mode: ViewMode,
    pub render_mode: RenderMode,
    pub image_type: ImageType,
    pub show_axes: bool,
    pub show_bounding_box: bool,
    pub bounding_box_color: Rgb,
    pub background_color: Rgb,
    pub autorotate: bool,
    pub mask_alpha: f64,
    pub brightness: f64,
    pub density: f64,
    /// `(gamma min, gamma mid, gamma max)`.
    pub levels: [f64; 3],
    pub interpolation_enabled: bool,
    pub region: Region,
    pub slice: Slice,
    pub time: u32,
    pub camera_state: Option<CameraState>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::ThreeD,
            render_mode: RenderMode::Volumetric,
            image_type: ImageType::SegmentedCell,
            show_axes: false,
            show_bounding_box: false,
            bounding_box_color: BOUNDING_BOX_COLOR_DEFAULT,
            background_color: BACKGROUND_COLOR_DEFAULT,
            autorotate: false,
            mask_alpha: MASK_ALPHA_DEFAULT,
            brightness: BRIGHTNESS_DEFAULT,
            density: DENSITY_DEFAULT,
            levels: LEVELS_DEFAULT,
            interpolation_enabled: true,
            region: Region::default(),
            slice: Slice::default(),
            time: 0,
            camera_state: None,
        }
    }
}

impl ViewerState {
    /// Restores the cross-field rules that the store's change handlers
    /// otherwise maintain. Anything built outside the store (decoded share
    /// links, config files) goes through here before use.
    pub fn enforce_invariants(&mut self) {
        if self.render_mode == RenderMode::PathTrace && self.view_mode != ViewMode::ThreeD {
            self.render_mode = RenderMode::Volumetric;
        }
        if self.render_mode == RenderMode::PathTrace {
            self.autorotate = false;
        }
        self.mask_alpha = self.mask_alpha.clamp(0.0, SLIDER_MAX);
        self.brightness = self.brightness.clamp(0.0, SLIDER_MAX);
        self.density = self.density.clamp(0.0, SLIDER_MAX);
        for level in &mut self.levels {
            *level = level.clamp(0.0, LEVELS_MAX);
        }
    }

    /// Camera in effect: the explicit one, or the view mode's default.
    pub fn effective_camera(&self) -> CameraState {
        self.camera_state
            .unwrap_or_else(|| CameraState::default_for(self.view_mode))
    }

    /// Gamma levels with the midpoint pulled back between min and max.
    pub fn gamma_levels(&self) -> [f64; 3] {
        let [a, mid, b] = self.levels;
        let (min, max) = (a.min(b), a.max(b));
        if mid < min || mid > max {
            [min, (min + max) / 2.0, max]
        } else {
            [min, mid, max]
        }
    }
}

/// A `ViewerState` where every field may be left unspecified.
///
/// Decoders produce this so that merging several sources (config file,
/// navigation props, share link) never overrides a field a later source
/// did not mention.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialViewerState {
    pub view_mode: Option<ViewMode>,
    pub render_mode: Option<RenderMode>,
    pub image_type: Option<ImageType>,
    pub show_axes: Option<bool>,
    pub show_bounding_box: Option<bool>,
    pub bounding_box_color: Option<Rgb>,
    pub background_color: Option<Rgb>,
    pub autorotate: Option<bool>,
    pub mask_alpha: Option<f64>,
    pub brightness: Option<f64>,
    pub density: Option<f64>,
    pub levels: Option<[f64; 3]>,
    pub interpolation_enabled: Option<bool>,
    pub region: Option<PartialRegion>,
    pub slice: Option<PartialSlice>,
    pub time: Option<u32>,
    pub camera_state: Option<PartialCameraState>,
}

impl PartialViewerState {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fills every unspecified field from `base`, then restores invariants.
    pub fn apply_to(&self, base: &ViewerState) -> ViewerState {
        let view_mode = self.view_mode.unwrap_or(base.view_mode);
        let camera_state = match self.camera_state {
            Some(partial) => Some(
                base.camera_state
                    .unwrap_or_else(|| CameraState::default_for(view_mode))
                    .merged(&partial),
            ),
            None => base.camera_state,
        };
        let mut state = ViewerState {
            view_mode,
            render_mode: self.render_mode.unwrap_or(base.render_mode),
            image_type: self.image_type.unwrap_or(base.image_type),
            show_axes: self.show_axes.unwrap_or(base.show_axes),
            show_bounding_box: self.show_bounding_box.unwrap_or(base.show_bounding_box),
            bounding_box_color: self.bounding_box_color.unwrap_or(base.bounding_box_color),
            background_color: self.background_color.unwrap_or(base.background_color),
            autorotate: self.autorotate.unwrap_or(base.autorotate),
            mask_alpha: self.mask_alpha.unwrap_or(base.mask_alpha),
            brightness: self.brightness.unwrap_or(base.brightness),
            density: self.density.unwrap_or(base.density),
            levels: self.levels.unwrap_or(base.levels),
            interpolation_enabled: self
                .interpolation_enabled
                .unwrap_or(base.interpolation_enabled),
            region: self
                .region
                .map_or(base.region, |partial| base.region.merged(&partial)),
            slice: self
                .slice
                .map_or(base.slice, |partial| base.slice.merged(&partial)),
            time: self.time.unwrap_or(base.time),
            camera_state,
        };
        state.enforce_invariants();
        state
    }

    /// Fields of `self` win; unset fields fall back to `other`. Nested
    /// partials merge field by field.
    pub fn or(&self, other: &PartialViewerState) -> PartialViewerState {
        PartialViewerState {
            view_mode: self.view_mode.or(other.view_mode),
            render_mode: self.render_mode.or(other.render_mode),
            image_type: self.image_type.or(other.image_type),
            show_axes: self.show_axes.or(other.show_axes),
            show_bounding_box: self.show_bounding_box.or(other.show_bounding_box),
            bounding_box_color: self.bounding_box_color.or(other.bounding_box_color),
            background_color: self.background_color.or(other.background_color),
            autorotate: self.autorotate.or(other.autorotate),
            mask_alpha: self.mask_alpha.or(other.mask_alpha),
            brightness: self.brightness.or(other.brightness),
            density: self.density.or(other.density),
            levels: self.levels.or(other.levels),
            interpolation_enabled: self.interpolation_enabled.or(other.interpolation_enabled),
            region: merge_option(self.region, other.region, |a, b| PartialRegion {
                x: a.x.or(b.x),
                y: a.y.or(b.y),
                z: a.z.or(b.z),
            }),
            slice: merge_option(self.slice, other.slice, |a, b| PartialSlice {
                x: a.x.or(b.x),
                y: a.y.or(b.y),
                z: a.z.or(b.z),
            }),
            time: self.time.or(other.time),
            camera_state: merge_option(self.camera_state, other.camera_state, |a, b| a.or(b)),
        }
    }
}

fn merge_option<T>(
    first: Option<T>,
    second: Option<T>,
    merge: impl FnOnce(T, T) -> T,
) -> Option<T> {
    match (first, second) {
        (Some(a), Some(b)) => Some(merge(a, b)),
        (a, b) => a.or(b),
    }
}

impl From<&ViewerState> for PartialViewerState {
    fn from(state: &ViewerState) -> Self {
        Self {
            view_mode: Some(state.view_mode),
            render_mode: Some(state.render_mode),
            image_type: Some(state.image_type),
            show_axes: Some(state.show_axes),
            show_bounding_box: Some(state.show_bounding_box),
            bounding_box_color: Some(state.bounding_box_color),
            background_color: Some(state.background_color),
            autorotate: Some(state.autorotate),
            mask_alpha: Some(state.mask_alpha),
            brightness: Some(state.brightness),
            density: Some(state.density),
            levels: Some(state.levels),
            interpolation_enabled: Some(state.interpolation_enabled),
            region: Some(state.region.into()),
            slice: Some(state.slice.into()),
            time: Some(state.time),
            camera_state: state.camera_state.map(PartialCameraState::from),
        }
    }
}
