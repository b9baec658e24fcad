use serde::{Deserialize, Serialize};

use super::ViewMode;

pub type Vec3 = [f64; 3];

pub const DEFAULT_ORTHO_SCALE: f64 = 0.5;
pub const DEFAULT_FOV_DEGREES: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub ortho_scale: f64,
    /// Vertical field of view in degrees.
    pub fov: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::default_for(ViewMode::ThreeD)
    }
}

impl CameraState {
    /// Camera the renderer starts from in each view mode. Planar modes look
    /// down the axis orthogonal to their plane.
    pub fn default_for(view_mode: ViewMode) -> Self {
        let (position, up) = match view_mode {
            ViewMode::ThreeD => ([0.0, 0.0, 5.0], [0.0, 1.0, 0.0]),
            ViewMode::XY => ([0.0, 0.0, 2.0], [0.0, 1.0, 0.0]),
            ViewMode::XZ => ([0.0, 2.0, 0.0], [0.0, 0.0, 1.0]),
            ViewMode::YZ => ([2.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        };
        Self {
            position,
            target: [0.0, 0.0, 0.0],
            up,
            ortho_scale: DEFAULT_ORTHO_SCALE,
            fov: DEFAULT_FOV_DEGREES,
        }
    }

    pub fn merged(&self, partial: &PartialCameraState) -> Self {
        Self {
            position: partial.position.unwrap_or(self.position),
            target: partial.target.unwrap_or(self.target),
            up: partial.up.unwrap_or(self.up),
            ortho_scale: partial.ortho_scale.unwrap_or(self.ortho_scale),
            fov: partial.fov.unwrap_or(self.fov),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialCameraState {
    pub position: Option<Vec3>,
    pub target: Option<Vec3>,
    pub up: Option<Vec3>,
    pub ortho_scale: Option<f64>,
    pub fov: Option<f64>,
}

impl PartialCameraState {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fields of `self` win; anything unset falls back to `other`.
    pub fn or(self, other: PartialCameraState) -> Self {
        Self {
            position: self.position.or(other.position),
            target: self.target.or(other.target),
            up: self.up.or(other.up),
            ortho_scale: self.ortho_scale.or(other.ortho_scale),
            fov: self.fov.or(other.fov),
        }
    }
}

impl From<CameraState> for PartialCameraState {
    fn from(camera: CameraState) -> Self {
        Self {
            position: Some(camera.position),
            target: Some(camera.target),
            up: Some(camera.up),
            ortho_scale: Some(camera.ortho_scale),
            fov: Some(camera.fov),
        }
    }
}
