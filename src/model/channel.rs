use std::fmt;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{
    ControlPoint, LutSetting, ModelError, Result, Rgb, TFEDITOR_MAX_BIN, control_points_to_ramp,
    ramp_to_control_points,
};

pub const ISOVALUE_DEFAULT: f64 = 188.0;
pub const ISOVALUE_MAX: f64 = 255.0;

pub const DEFAULT_CHANNEL_COLORS: [Rgb; 8] = [
    [255, 0, 255],
    [0, 255, 255],
    [255, 255, 0],
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 128, 0],
    [128, 0, 255],
];

/// Channels shown when nothing says otherwise.
pub const DEFAULT_VOLUMES_ENABLED: usize = 3;

pub fn default_channel_color(index: usize) -> Rgb {
    DEFAULT_CHANNEL_COLORS[index % DEFAULT_CHANNEL_COLORS.len()]
}

/// Settings used when neither configuration nor link mention channels: the
/// first [`DEFAULT_VOLUMES_ENABLED`] channels have their volume on.
pub fn default_channel_settings() -> Vec<ViewerChannelSetting> {
    (0..DEFAULT_VOLUMES_ENABLED)
        .map(|index| ViewerChannelSetting {
            volume_enabled: Some(true),
            ..ViewerChannelSetting::new(ChannelMatcher::Index(index))
        })
        .collect()
}

/// Display settings of one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelState {
    pub name: String,
    pub volume_enabled: bool,
    pub isosurface_enabled: bool,
    pub isovalue: f64,
    /// Isosurface opacity, `[0, 1]`.
    pub opacity: f64,
    pub color: Rgb,
    pub colorize_enabled: bool,
    pub colorize_alpha: f64,
    /// Advanced transfer-function mode when set, ramp mode otherwise.
    pub use_control_points: bool,
    pub control_points: Vec<ControlPoint>,
    pub ramp: [f64; 2],
    /// `lut` shorthand still waiting for the channel histogram. Cleared by
    /// any explicit ramp or control point edit.
    #[serde(default)]
    pub lut: Option<LutSetting>,
}

impl ChannelState {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        let ramp = [0.0, TFEDITOR_MAX_BIN];
        Self {
            name: name.into(),
            volume_enabled: false,
            isosurface_enabled: false,
            isovalue: ISOVALUE_DEFAULT,
            opacity: 1.0,
            color: default_channel_color(index),
            colorize_enabled: false,
            colorize_alpha: 1.0,
            use_control_points: false,
            control_points: ramp_to_control_points(ramp),
            ramp,
            lut: None,
        }
    }

    /// Defaults for `name`, overlaid with every matching entry of `settings`
    /// in order; later entries win field by field.
    pub fn initial(name: &str, index: usize, settings: &[ViewerChannelSetting]) -> Self {
        settings
            .iter()
            .filter(|setting| setting.matcher.matches(index, name))
            .fold(Self::new(name, index), |state, setting| setting.apply_to(&state))
    }

    /// Captures every field as an explicit setting bound to `index`.
    pub fn to_setting(&self, index: usize) -> ViewerChannelSetting {
        ViewerChannelSetting {
            matcher: ChannelMatcher::Index(index),
            volume_enabled: Some(self.volume_enabled),
            isosurface_enabled: Some(self.isosurface_enabled),
            isovalue: Some(self.isovalue),
            opacity: Some(self.opacity),
            color: Some(self.color),
            colorize_enabled: Some(self.colorize_enabled),
            colorize_alpha: Some(self.colorize_alpha),
            lut: self.lut,
            ramp: Some(self.ramp),
            control_points: Some(self.control_points.clone()),
            use_control_points: Some(self.use_control_points),
        }
    }
}

/// Selects which channels a [`ViewerChannelSetting`] applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelMatcher {
    Index(usize),
    Name(String),
    Pattern { pattern: ChannelPattern },
}

impl ChannelMatcher {
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(ChannelMatcher::Pattern {
            pattern: ChannelPattern::new(pattern)?,
        })
    }

    pub fn matches(&self, index: usize, name: &str) -> bool {
        match self {
            ChannelMatcher::Index(expected) => *expected == index,
            ChannelMatcher::Name(expected) => expected == name,
            ChannelMatcher::Pattern { pattern } => pattern.0.is_match(name),
        }
    }
}

/// Channel-name regex, compiled once. Serialized as its source text.
#[derive(Debug, Clone)]
pub struct ChannelPattern(Regex);

impl ChannelPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(ChannelPattern)
            .map_err(|error| ModelError::InvalidChannelPattern {
                pattern: pattern.to_string(),
                reason: error.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for ChannelPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ChannelPattern {}

impl fmt::Display for ChannelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChannelPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChannelPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        ChannelPattern::new(&pattern).map_err(D::Error::custom)
    }
}

/// Partial channel settings as supplied by a share link or configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerChannelSetting {
    #[serde(rename = "match")]
    pub matcher: ChannelMatcher,
    #[serde(default)]
    pub volume_enabled: Option<bool>,
    #[serde(default)]
    pub isosurface_enabled: Option<bool>,
    #[serde(default)]
    pub isovalue: Option<f64>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub colorize_enabled: Option<bool>,
    #[serde(default)]
    pub colorize_alpha: Option<f64>,
    #[serde(default)]
    pub lut: Option<LutSetting>,
    #[serde(default)]
    pub ramp: Option<[f64; 2]>,
    #[serde(default)]
    pub control_points: Option<Vec<ControlPoint>>,
    #[serde(default)]
    pub use_control_points: Option<bool>,
}

impl ViewerChannelSetting {
    pub fn new(matcher: ChannelMatcher) -> Self {
        Self {
            matcher,
            volume_enabled: None,
            isosurface_enabled: None,
            isovalue: None,
            opacity: None,
            color: None,
            colorize_enabled: None,
            colorize_alpha: None,
            lut: None,
            ramp: None,
            control_points: None,
            use_control_points: None,
        }
    }

    /// Overlays the specified fields onto `base`. A ramp without control
    /// points (or the reverse) regenerates the missing representation.
    pub fn apply_to(&self, base: &ChannelState) -> ChannelState {
        let (ramp, control_points) = match (&self.ramp, &self.control_points) {
            (Some(ramp), Some(points)) => (*ramp, points.clone()),
            (Some(ramp), None) => (*ramp, ramp_to_control_points(*ramp)),
            (None, Some(points)) => (control_points_to_ramp(points), points.clone()),
            (None, None) => (base.ramp, base.control_points.clone()),
        };
        let transfer_function_set = self.ramp.is_some() || self.control_points.is_some();
        let lut = match self.lut {
            Some(lut) => Some(lut),
            None if transfer_function_set => None,
            None => base.lut,
        };
        ChannelState {
            name: base.name.clone(),
            volume_enabled: self.volume_enabled.unwrap_or(base.volume_enabled),
            isosurface_enabled: self.isosurface_enabled.unwrap_or(base.isosurface_enabled),
            isovalue: self
                .isovalue
                .map_or(base.isovalue, |v| v.clamp(0.0, ISOVALUE_MAX)),
            opacity: self.opacity.map_or(base.opacity, |v| v.clamp(0.0, 1.0)),
            color: self.color.unwrap_or(base.color),
            colorize_enabled: self.colorize_enabled.unwrap_or(base.colorize_enabled),
            colorize_alpha: self
                .colorize_alpha
                .map_or(base.colorize_alpha, |v| v.clamp(0.0, 1.0)),
            use_control_points: self.use_control_points.unwrap_or(base.use_control_points),
            control_points,
            ramp,
            lut,
        }
    }
}
