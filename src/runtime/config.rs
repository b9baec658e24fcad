use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{ChannelState, PartialViewerState, ViewerChannelSetting, ViewerState};

use super::Result;

/// Viewer configuration supplied alongside a share link (navigation props,
/// an embedding page, or a file on disk). Share-link values override it
/// field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub viewer: PartialViewerState,
    pub channels: Vec<ViewerChannelSetting>,
    pub data_sources: Vec<String>,
    /// Leave default values out of generated share links.
    pub remove_defaults: bool,
    /// Linked from load-error banners.
    pub bug_report_url: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewer: PartialViewerState::default(),
            channels: Vec::new(),
            data_sources: Vec::new(),
            remove_defaults: true,
            bug_report_url: None,
        }
    }
}

/// A complete viewer state, as printed by `vole decode` and read by
/// `vole encode`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerSnapshot {
    pub viewer: ViewerState,
    pub channels: Vec<ChannelState>,
    pub data_sources: Vec<String>,
}

fn is_yaml(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(extension.as_str(), "yaml" | "yml")
}

/// Reads YAML for `.yaml`/`.yml` files and JSON otherwise.
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let document = if is_yaml(path) {
        serde_yaml::from_str::<T>(&raw)?
    } else {
        serde_json::from_str::<T>(&raw)?
    };
    Ok(document)
}

pub fn save_document<T: Serialize>(path: impl AsRef<Path>, document: &T) -> Result<()> {
    let path = path.as_ref();
    let serialized = if is_yaml(path) {
        serde_yaml::to_string(document)?
    } else {
        serde_json::to_string_pretty(document)?
    };
    fs::write(path, serialized)?;
    Ok(())
}

pub fn load_config(path: impl AsRef<Path>) -> Result<ViewerConfig> {
    load_document(path)
}
