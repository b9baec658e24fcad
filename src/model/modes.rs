use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Which plane (or the full volume) is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "3D")]
    ThreeD,
    XY,
    XZ,
    YZ,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [ViewMode::ThreeD, ViewMode::XY, ViewMode::XZ, ViewMode::YZ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::ThreeD => "3D",
            ViewMode::XY => "XY",
            ViewMode::XZ => "XZ",
            ViewMode::YZ => "YZ",
        }
    }

    pub fn is_planar(self) -> bool {
        self != ViewMode::ThreeD
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ModelError::UnknownViewMode(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Volumetric,
    #[serde(rename = "maxproject")]
    MaxProject,
    #[serde(rename = "pathtrace")]
    PathTrace,
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] = [
        RenderMode::Volumetric,
        RenderMode::MaxProject,
        RenderMode::PathTrace,
    ];

    /// The spelling used both internally and in share links.
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Volumetric => "volumetric",
            RenderMode::MaxProject => "maxproject",
            RenderMode::PathTrace => "pathtrace",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RenderMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ModelError::UnknownRenderMode(value.to_string()))
    }
}

/// Whether the loaded volume is a single segmented cell or the full field of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ImageType {
    #[default]
    #[serde(rename = "cell")]
    SegmentedCell,
    #[serde(rename = "fov")]
    FullField,
}

impl ImageType {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageType::SegmentedCell => "cell",
            ImageType::FullField => "fov",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cell" => Ok(ImageType::SegmentedCell),
            "fov" => Ok(ImageType::FullField),
            _ => Err(ModelError::UnknownImageType(value.to_string())),
        }
    }
}
