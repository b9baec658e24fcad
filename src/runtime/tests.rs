use std::fs;

use crate::codec::UrlParams;
use crate::model::{
    ChannelMatcher, ChannelState, DEFAULT_VOLUMES_ENABLED, ImageType, PartialViewerState,
    RenderMode, ViewMode, ViewerChannelSetting, ViewerState,
};
use crate::store::{ChannelSettingChange, ResetKind, ViewerSettingChange};

use super::{
    CatalogFileInfo, DataSourceKind, DatasetSummary, LoadError, LoadErrorKind, LoadErrorQueue,
    StaticCatalog, StaticDataset, ViewerConfig, ViewerSession, ViewerSnapshot,
    is_valid_combination, load_config, load_document, normalize_share_params,
    parse_data_sources, save_document,
};

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn catalog() -> StaticCatalog {
    StaticCatalog::new(vec![StaticDataset {
        summary: DatasetSummary {
            id: "aics".to_string(),
            name: "AICS hiPSC cells".to_string(),
            manifest: "manifests/aics.json".to_string(),
        },
        files: vec![CatalogFileInfo {
            cell_id: "42".to_string(),
            volume_url: "https://cells.example/42.ome.zarr".to_string(),
            fov_volume_url: Some("https://cells.example/fov-7.ome.zarr".to_string()),
        }],
    }])
}

#[test]
fn link_values_override_config_field_by_field() {
    let config = ViewerConfig {
        viewer: PartialViewerState {
            brightness: Some(40.0),
            density: Some(20.0),
            ..PartialViewerState::default()
        },
        channels: vec![ViewerChannelSetting {
            volume_enabled: Some(true),
            color: Some([255, 0, 0]),
            ..ViewerChannelSetting::new(ChannelMatcher::Index(0))
        }],
        ..ViewerConfig::default()
    };
    let params = UrlParams::from_query("bright=85&view=Z&c0=col:00ff00");
    let mut session = ViewerSession::new(&config, &params);

    let viewer = session.store().viewer();
    assert_eq!(viewer.brightness, 85.0);
    assert_eq!(viewer.density, 20.0);
    assert_eq!(viewer.view_mode, ViewMode::XY);

    assert!(session.on_channels_available(&names(&["DNA", "Membrane"])));
    let first = &session.store().channels()[0];
    assert!(first.volume_enabled);
    assert_eq!(first.color, [0, 255, 0]);
    assert_eq!(session.store().channels()[1], ChannelState::new("Membrane", 1));
}

#[test]
fn share_url_reproduces_the_session() {
    let mut session = ViewerSession::from_url(
        "https://viewer.example/?url=https%3A%2F%2Fx.org%2Fcell.ome.zarr&mode=maxproject&c1=ven:1",
    )
    .expect("url");
    let channel_names = names(&["DNA", "Membrane", "Structure"]);
    session.on_channels_available(&channel_names);
    session.store_mut().change_viewer_setting(ViewerSettingChange::Density(12.5));
    session
        .store_mut()
        .change_channel_setting(2, ChannelSettingChange::Color([10, 20, 30]))
        .expect("channel 2");

    let link = session
        .share_url("https://viewer.example/", true)
        .expect("share url");
    let mut restored = ViewerSession::from_url(&link).expect("shared url");
    restored.on_channels_available(&channel_names);

    assert_eq!(restored.snapshot(), session.snapshot());
    assert_eq!(
        restored.snapshot().data_sources,
        vec!["https://x.org/cell.ome.zarr".to_string()]
    );
    assert_eq!(restored.store().viewer().render_mode, RenderMode::MaxProject);
}

#[test]
fn saved_reset_waits_for_reloaded_channels() {
    let mut session = ViewerSession::from_url("view=Z").expect("query");
    session.on_channels_available(&names(&["DNA", "Membrane"]));
    let first_load = session.begin_load();

    session
        .store_mut()
        .change_viewer_setting(ViewerSettingChange::ViewMode(ViewMode::ThreeD));
    session
        .store_mut()
        .change_channel_setting(0, ChannelSettingChange::Opacity(0.25))
        .expect("channel 0");

    let outcome = session.reset(ResetKind::Saved);
    assert!(outcome.reload_required);
    assert_eq!(outcome.pending_channels, vec![0, 1]);
    assert_eq!(session.store().viewer().view_mode, ViewMode::XY);
    assert_eq!(session.store().channels()[0].opacity, 0.25);

    assert!(!session.on_channel_loaded(0, first_load));
    let generation = outcome.generation.expect("generation");
    assert!(generation > first_load);
    assert!(session.on_channel_loaded(0, generation));
    assert_eq!(session.store().channels()[0].opacity, 1.0);
}

#[test]
fn save_current_moves_the_reset_target() {
    let mut session = ViewerSession::from_url("bright=85").expect("query");
    session.on_channels_available(&names(&["DNA"]));
    session
        .store_mut()
        .change_viewer_setting(ViewerSettingChange::Brightness(30.0));
    session.save_current();
    session
        .store_mut()
        .change_viewer_setting(ViewerSettingChange::Brightness(60.0));

    let outcome = session.reset(ResetKind::Saved);
    assert!(!outcome.reload_required);
    assert_eq!(session.store().viewer().brightness, 30.0);

    session.reset(ResetKind::Default);
    assert_eq!(*session.store().viewer(), ViewerState::default());
}

#[test]
fn yaml_config_drives_a_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("viewer.yaml");
    fs::write(
        &path,
        r#"
viewer:
  viewMode: XZ
  brightness: 40
channels:
  - match: 1
    volumeEnabled: true
  - match:
      pattern: "^Mem"
    color: [0, 0, 255]
dataSources:
  - https://x.org/cell.ome.tiff
removeDefaults: false
"#,
    )
    .expect("write config");

    let config = load_config(&path).expect("config");
    assert!(!config.remove_defaults);
    let mut session = ViewerSession::new(&config, &UrlParams::default());
    assert!(!session.remove_defaults());
    assert_eq!(session.store().viewer().view_mode, ViewMode::XZ);
    assert_eq!(session.store().viewer().brightness, 40.0);
    assert_eq!(session.data_sources()[0].kind, DataSourceKind::Tiff);

    session.on_channels_available(&names(&["DNA", "Membrane"]));
    let membrane = &session.store().channels()[1];
    assert!(membrane.volume_enabled);
    assert_eq!(membrane.color, [0, 0, 255]);
}

#[test]
fn snapshots_roundtrip_through_json_and_yaml() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = ViewerSession::from_url("mask=80&lvl=10,100,200").expect("query");
    session.on_channels_available(&names(&["DNA"]));
    let snapshot = session.snapshot();

    for file in ["state.json", "state.yml"] {
        let path = dir.path().join(file);
        save_document(&path, &snapshot).expect("save");
        let loaded: ViewerSnapshot = load_document(&path).expect("load");
        assert_eq!(loaded, snapshot);
    }

    let missing = load_config(dir.path().join("missing.json"));
    assert!(missing.is_err());
}

#[test]
fn data_source_kind_follows_the_extension() {
    let sources = parse_data_sources(&[
        "https://x.org/a.ome.zarr/",
        "https://x.org/atlas.json?v=2",
        "local/B.TIF",
        "  ",
    ]);
    let kinds = sources.iter().map(|source| source.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![DataSourceKind::Zarr, DataSourceKind::Json, DataSourceKind::Tiff]
    );
    assert!(!is_valid_combination(&sources));
    assert!(is_valid_combination(&sources[..1]));

    let session = ViewerSession::from_url(
        "url=https%3A%2F%2Fx.org%2Fa.zarr,https%3A%2F%2Fx.org%2Fb.tiff",
    )
    .expect("query");
    let error = session.errors().current().expect("error");
    assert_eq!(error.kind, LoadErrorKind::InvalidMultiSource);
}

#[test]
fn catalog_links_resolve_by_image_type() {
    let mut catalog = catalog();
    let mut session = ViewerSession::from_url("dataset=aics&id=42&image=fov").expect("query");
    assert_eq!(session.store().viewer().image_type, ImageType::FullField);

    let volume = session.resolve_catalog(&mut catalog);
    assert_eq!(volume.as_deref(), Some("https://cells.example/fov-7.ome.zarr"));
    assert_eq!(session.data_sources().len(), 1);

    let params = session.share_params(true);
    assert_eq!(params.dataset.as_deref(), Some("aics"));
    assert_eq!(params.id.as_deref(), Some("42"));
    assert_eq!(params.url, None);
}

#[test]
fn catalog_failures_leave_the_session_empty() {
    let mut catalog = catalog();
    let mut unknown_cell = ViewerSession::from_url("dataset=aics&id=7").expect("query");
    assert_eq!(unknown_cell.resolve_catalog(&mut catalog), None);
    assert!(unknown_cell.data_sources().is_empty());
    assert!(unknown_cell.errors().is_empty());

    let mut unknown_dataset = ViewerSession::from_url("dataset=other&id=42").expect("query");
    assert_eq!(unknown_dataset.resolve_catalog(&mut catalog), None);

    let mut with_url =
        ViewerSession::from_url("url=https%3A%2F%2Fx.org%2Fa.zarr&dataset=aics&id=42")
            .expect("query");
    assert!(with_url.catalog_request().is_none());
    assert_eq!(with_url.resolve_catalog(&mut catalog), None);
}

#[test]
fn load_errors_are_shown_one_at_a_time() {
    let mut queue = LoadErrorQueue::default();
    assert!(queue.current().is_none());
    queue.push(LoadError::new(LoadErrorKind::from_http_status(404), "cell.zarr"));
    queue.push(LoadError::new(LoadErrorKind::TooLarge, "fov.zarr"));

    let current = queue.current().expect("current");
    assert_eq!(current.kind, LoadErrorKind::NotFound);
    assert!(current.to_string().contains("could not be found"));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.remaining(), 1);

    let next = queue.dismiss().expect("next");
    assert_eq!(next.kind, LoadErrorKind::TooLarge);
    assert_eq!(queue.dismiss(), None);
    assert!(queue.is_empty());

    assert_eq!(LoadErrorKind::from_http_status(500), LoadErrorKind::LoadFailed);
    assert_eq!(LoadErrorKind::from_http_status(0), LoadErrorKind::Unknown);
}

#[test]
fn reported_errors_queue_on_the_session() {
    let config = ViewerConfig {
        bug_report_url: Some("https://issues.example/new".to_string()),
        ..ViewerConfig::default()
    };
    let mut session = ViewerSession::new(&config, &UrlParams::default());
    session.report_load_error(LoadError::new(LoadErrorKind::InvalidMetadata, "zattrs"));
    session.report_load_error(LoadError::new(LoadErrorKind::Unknown, "?"));
    assert_eq!(session.errors().len(), 2);
    assert_eq!(session.bug_report_url(), Some("https://issues.example/new"));
    session.errors_mut().dismiss_all();
    assert!(session.errors().is_empty());
}

#[test]
fn bare_query_with_a_data_url_opens_a_session() {
    let session = ViewerSession::from_url("url=https://a.org/x.zarr&view=Z").expect("query");
    assert_eq!(session.data_sources().len(), 1);
    assert_eq!(session.data_sources()[0].url, "https://a.org/x.zarr");
    assert_eq!(session.data_sources()[0].kind, DataSourceKind::Zarr);
    assert_eq!(session.store().viewer().view_mode, ViewMode::XY);
}

#[test]
fn normalize_keeps_the_lut_shorthand() {
    let params = UrlParams::from_query("c0=ven:1,lut:p50:p99&bright=70&foo=bar");
    let normalized = normalize_share_params(&ViewerConfig::default(), &params);
    assert_eq!(
        normalized.channels.get(&0).map(String::as_str),
        Some("lut:p50:p99,ven:1")
    );
    assert_eq!(normalized.viewer.bright, None);
    assert_eq!(normalized.extra.get("foo").map(String::as_str), Some("bar"));

    let mut session = ViewerSession::new(&ViewerConfig::default(), &params);
    session.on_channels_available(&names(&["DNA"]));
    let shared = session.share_params(true);
    assert_eq!(shared.channels.get(&0), normalized.channels.get(&0));
}

#[test]
fn normalize_leaves_unmentioned_channels_out() {
    let params = UrlParams::from_query("view=X&bright=70");
    let normalized = normalize_share_params(&ViewerConfig::default(), &params);
    assert!(normalized.channels.is_empty());
    assert_eq!(normalized.viewer.bright, None);
    assert_eq!(normalized.viewer.view.as_deref(), Some("X"));
}

#[test]
fn leading_channels_show_without_channel_settings() {
    let mut session = ViewerSession::from_url("bright=85").expect("query");
    let channel_names = names(&["a", "b", "c", "d"]);
    session.on_channels_available(&channel_names);
    let enabled = session
        .store()
        .channels()
        .iter()
        .filter(|channel| channel.volume_enabled)
        .count();
    assert_eq!(enabled, DEFAULT_VOLUMES_ENABLED);
    assert!(!session.store().channels()[3].volume_enabled);

    session
        .store_mut()
        .change_channel_setting(0, ChannelSettingChange::VolumeEnabled(false))
        .expect("channel 0");
    session.reset(ResetKind::Default);
    assert!(session.store().channels()[0].volume_enabled);
}
