use serde::{Deserialize, Serialize};

use super::{Rgb, WHITE};

/// Highest intensity bin of the transfer-function editor.
pub const TFEDITOR_MAX_BIN: f64 = 255.0;
pub const DEFAULT_CONTROL_POINT_COLOR: Rgb = WHITE;

/// One vertex of a piecewise-linear transfer function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Voxel intensity.
    pub x: f64,
    /// In `[0, 1]`.
    pub opacity: f64,
    pub color: Rgb,
}

impl ControlPoint {
    pub fn new(x: f64, opacity: f64) -> Self {
        Self {
            x,
            opacity,
            color: DEFAULT_CONTROL_POINT_COLOR,
        }
    }
}

/// Sorts control points by ascending intensity; ties keep their order.
pub fn sort_control_points(points: &mut [ControlPoint]) {
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
}

/// Collapses control points to the `[min, max]` ramp they were built from.
///
/// Only the inner two points of the canonical four-point shape are read, so
/// any other shape loses detail.
pub fn control_points_to_ramp(points: &[ControlPoint]) -> [f64; 2] {
    if points.len() < 3 {
        return [0.0, TFEDITOR_MAX_BIN];
    }
    [points[1].x, points[2].x]
}

/// Canonical ramp shape: transparent up to `min`, opaque from `max`.
pub fn ramp_to_control_points([min, max]: [f64; 2]) -> Vec<ControlPoint> {
    vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::new(min, 0.0),
        ControlPoint::new(max, 1.0),
        ControlPoint::new(TFEDITOR_MAX_BIN, 1.0),
    ]
}

/// True when `points` survives a trip through the ramp representation.
pub fn is_canonical_ramp(points: &[ControlPoint]) -> bool {
    points.len() == 4 && ramp_to_control_points(control_points_to_ramp(points)) == points
}
