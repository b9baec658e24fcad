use serde::{Deserialize, Serialize};

/// Fractional `[min, max]` extent along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub const FULL: AxisRange = AxisRange { min: 0.0, max: 1.0 };

    /// Clamps both ends into `[0, 1]` and orders them.
    pub fn new(a: f64, b: f64) -> Self {
        let a = a.clamp(0.0, 1.0);
        let b = b.clamp(0.0, 1.0);
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Clipped sub-volume, only honoured in 3D view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl Region {
    pub fn merged(&self, partial: &PartialRegion) -> Self {
        Self {
            x: partial.x.map_or(self.x, |r| AxisRange::new(r.min, r.max)),
            y: partial.y.map_or(self.y, |r| AxisRange::new(r.min, r.max)),
            z: partial.z.map_or(self.z, |r| AxisRange::new(r.min, r.max)),
        }
    }

    pub fn axes(&self) -> [AxisRange; 3] {
        [self.x, self.y, self.z]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialRegion {
    pub x: Option<AxisRange>,
    pub y: Option<AxisRange>,
    pub z: Option<AxisRange>,
}

impl From<Region> for PartialRegion {
    fn from(region: Region) -> Self {
        Self {
            x: Some(region.x),
            y: Some(region.y),
            z: Some(region.z),
        }
    }
}

/// Single-slice position per axis, used by the planar view modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Slice {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            z: 0.5,
        }
    }
}

impl Slice {
    pub fn merged(&self, partial: &PartialSlice) -> Self {
        Self {
            x: partial.x.map_or(self.x, |v| v.clamp(0.0, 1.0)),
            y: partial.y.map_or(self.y, |v| v.clamp(0.0, 1.0)),
            z: partial.z.map_or(self.z, |v| v.clamp(0.0, 1.0)),
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSlice {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl From<Slice> for PartialSlice {
    fn from(slice: Slice) -> Self {
        Self {
            x: Some(slice.x),
            y: Some(slice.y),
            z: Some(slice.z),
        }
    }
}
