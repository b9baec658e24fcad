use serde::{Deserialize, Serialize};

use crate::model::{ChannelState, PartialViewerState, ViewerChannelSetting, ViewerState};

use super::channel::{deserialize_channels, serialize_channel_state};
use super::key_value::{decode_component, encode_component};
use super::viewer::{deserialize_viewer_state, serialize_viewer_state};
use super::UrlParams;

/// Legacy catalog lookup keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogParams {
    pub dataset: String,
    pub id: String,
}

/// Everything a share link specifies, still partial.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerUrlConfig {
    pub viewer: PartialViewerState,
    pub channels: Vec<ViewerChannelSetting>,
    pub data_urls: Vec<String>,
    pub catalog: Option<CatalogParams>,
}

/// Splits the `url` value into individually percent-decoded sources.
pub fn decode_data_urls(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| decode_component(part.trim()))
        .filter(|part| !part.is_empty())
        .collect()
}

pub fn encode_data_urls<S: AsRef<str>>(urls: &[S]) -> String {
    urls.iter()
        .map(|url| encode_component(url.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn deserialize_url_params(params: &UrlParams) -> ViewerUrlConfig {
    let catalog = match (&params.dataset, &params.id) {
        (Some(dataset), Some(id)) => Some(CatalogParams {
            dataset: dataset.clone(),
            id: id.clone(),
        }),
        _ => None,
    };
    ViewerUrlConfig {
        viewer: deserialize_viewer_state(&params.viewer),
        channels: deserialize_channels(params),
        data_urls: params
            .url
            .as_deref()
            .map(decode_data_urls)
            .unwrap_or_default(),
        catalog,
    }
}

/// Share-link parameters for the current state. Channels whose block would
/// be empty are omitted.
pub fn serialize_viewer_url_params(
    state: &ViewerState,
    channels: &[ChannelState],
    remove_defaults: bool,
) -> UrlParams {
    let mut params = UrlParams {
        viewer: serialize_viewer_state(state, remove_defaults),
        ..UrlParams::default()
    };
    for (index, channel) in channels.iter().enumerate() {
        let block = serialize_channel_state(index, channel, remove_defaults);
        if !block.is_empty() {
            params.channels.insert(index, block);
        }
    }
    params
}
