use log::{debug, info};

use crate::codec::{
    UrlParams, deserialize_channels, deserialize_url_params, encode_data_urls,
    serialize_viewer_url_params,
};
use crate::model::{ChannelMatcher, ViewerChannelSetting, ViewerState, default_channel_settings};
use crate::store::{
    LoadGeneration, ResetCoordinator, ResetKind, ResetOutcome, ResetTarget, ViewerStore,
};

use super::{
    CatalogRequest, DataSource, DatasetCatalog, LoadError, LoadErrorKind, LoadErrorQueue, Result,
    ViewerConfig, ViewerSnapshot, is_valid_combination, parse_data_sources,
    resolve_catalog_request,
};

/// One open viewer: the store plus everything resolved from its
/// configuration and share link.
#[derive(Debug)]
pub struct ViewerSession {
    store: ViewerStore,
    resets: ResetCoordinator,
    channel_settings: Vec<ViewerChannelSetting>,
    data_sources: Vec<DataSource>,
    catalog_request: Option<CatalogRequest>,
    errors: LoadErrorQueue,
    remove_defaults: bool,
    bug_report_url: Option<String>,
}

impl ViewerSession {
    /// Share-link values win over `config` field by field. Channel settings
    /// from the link are appended after the configured ones so they take
    /// precedence for any channel both address. With no channel settings at
    /// all, the leading channels are shown.
    pub fn new(config: &ViewerConfig, params: &UrlParams) -> Self {
        let link = deserialize_url_params(params);
        let viewer = link.viewer.or(&config.viewer).apply_to(&ViewerState::default());

        let mut channel_settings = config.channels.clone();
        channel_settings.extend(link.channels);
        if channel_settings.is_empty() {
            channel_settings = default_channel_settings();
        }

        let urls = if link.data_urls.is_empty() {
            config.data_sources.clone()
        } else {
            link.data_urls
        };
        let data_sources = parse_data_sources(&urls);
        let catalog_request = if data_sources.is_empty() {
            link.catalog.map(CatalogRequest::from)
        } else {
            None
        };

        let mut errors = LoadErrorQueue::default();
        if !is_valid_combination(&data_sources) {
            errors.push(LoadError::new(
                LoadErrorKind::InvalidMultiSource,
                format!("{} sources of different formats", data_sources.len()),
            ));
        }

        debug!(
            "session with {} data sources and {} channel settings",
            data_sources.len(),
            channel_settings.len()
        );
        let saved = ResetTarget::new(viewer.clone(), channel_settings.clone());
        Self {
            store: ViewerStore::new(viewer, Vec::new()),
            resets: ResetCoordinator::new(saved),
            channel_settings,
            data_sources,
            catalog_request,
            errors,
            remove_defaults: config.remove_defaults,
            bug_report_url: config.bug_report_url.clone(),
        }
    }

    pub fn from_url(input: &str) -> Result<Self> {
        let params = UrlParams::from_url_or_query(input)?;
        Ok(Self::new(&ViewerConfig::default(), &params))
    }

    pub fn store(&self) -> &ViewerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ViewerStore {
        &mut self.store
    }

    pub fn channel_settings(&self) -> &[ViewerChannelSetting] {
        &self.channel_settings
    }

    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }

    pub fn catalog_request(&self) -> Option<&CatalogRequest> {
        self.catalog_request.as_ref()
    }

    pub fn remove_defaults(&self) -> bool {
        self.remove_defaults
    }

    pub fn bug_report_url(&self) -> Option<&str> {
        self.bug_report_url.as_deref()
    }

    pub fn begin_load(&mut self) -> LoadGeneration {
        self.resets.begin_load()
    }

    /// Volume metadata arrived with these channel names.
    pub fn on_channels_available(&mut self, names: &[String]) -> bool {
        self.store.set_channel_names(names, &self.channel_settings)
    }

    pub fn on_channel_loaded(&mut self, index: usize, generation: LoadGeneration) -> bool {
        self.resets
            .on_channel_loaded(&mut self.store, index, generation)
    }

    pub fn reset(&mut self, kind: ResetKind) -> ResetOutcome {
        self.resets.reset(&mut self.store, kind)
    }

    /// Makes the current state the target of [`ResetKind::Saved`].
    pub fn save_current(&mut self) {
        let channel_settings = self
            .store
            .channels()
            .iter()
            .enumerate()
            .map(|(index, channel)| channel.to_setting(index))
            .collect();
        self.resets.set_saved(ResetTarget::new(
            self.store.viewer().clone(),
            channel_settings,
        ));
    }

    pub fn report_load_error(&mut self, error: LoadError) {
        info!("volume load failed: {error}");
        self.errors.push(error);
    }

    pub fn errors(&self) -> &LoadErrorQueue {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut LoadErrorQueue {
        &mut self.errors
    }

    /// Resolves a legacy `dataset`/`id` link into a volume URL. Does nothing
    /// when the link already names its data sources.
    pub fn resolve_catalog(&mut self, catalog: &mut dyn DatasetCatalog) -> Option<String> {
        if !self.data_sources.is_empty() {
            return None;
        }
        let request = self.catalog_request.as_ref()?;
        let file_info = resolve_catalog_request(catalog, request)?;
        let volume = file_info
            .volume_for(self.store.viewer().image_type)
            .to_string();
        self.data_sources = vec![DataSource::new(volume.clone())];
        Some(volume)
    }

    /// Parameters of a link reproducing the current view. Legacy catalog
    /// links stay catalog links.
    pub fn share_params(&self, remove_defaults: bool) -> UrlParams {
        let mut params = serialize_viewer_url_params(
            self.store.viewer(),
            self.store.channels(),
            remove_defaults,
        );
        match &self.catalog_request {
            Some(request) => {
                params.dataset = Some(request.dataset.clone());
                params.id = Some(request.cell_id.clone());
            }
            None if !self.data_sources.is_empty() => {
                let urls: Vec<&str> = self
                    .data_sources
                    .iter()
                    .map(|source| source.url.as_str())
                    .collect();
                params.url = Some(encode_data_urls(&urls));
            }
            None => {}
        }
        params
    }

    pub fn share_url(&self, base: &str, remove_defaults: bool) -> Result<String> {
        Ok(self.share_params(remove_defaults).to_url(base)?)
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            viewer: self.store.viewer().clone(),
            channels: self.store.channels().to_vec(),
            data_sources: self
                .data_sources
                .iter()
                .map(|source| source.url.clone())
                .collect(),
        }
    }
}

/// Re-encodes a share link with default values removed. Without the volume
/// the channel names are unknown, so only index-addressed channel settings
/// carry over. Keys this crate does not interpret are kept.
pub fn normalize_share_params(config: &ViewerConfig, params: &UrlParams) -> UrlParams {
    let explicit = config
        .channels
        .iter()
        .cloned()
        .chain(deserialize_channels(params))
        .collect::<Vec<_>>();
    let mut session = ViewerSession::new(config, params);
    session.on_channels_available(&placeholder_channel_names(&explicit));

    let mut normalized = session.share_params(true);
    normalized.extra = params.extra.clone();
    normalized
}

fn placeholder_channel_names(settings: &[ViewerChannelSetting]) -> Vec<String> {
    let count = settings
        .iter()
        .filter_map(|setting| match setting.matcher {
            ChannelMatcher::Index(index) => Some(index + 1),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    (0..count).map(|index| format!("Channel {index}")).collect()
}
