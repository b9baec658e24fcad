use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Zarr,
    Tiff,
    /// Texture-atlas JSON.
    Json,
}

/// One volume location from the `url` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub url: String,
    pub kind: DataSourceKind,
}

impl DataSource {
    /// The loader is chosen from the path extension; anything unrecognized
    /// is treated as OME-Zarr.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = source_kind(&url);
        Self { url, kind }
    }
}

fn source_kind(url: &str) -> DataSourceKind {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    let path = path.trim_end_matches('/').to_ascii_lowercase();
    if path.ends_with(".json") {
        DataSourceKind::Json
    } else if path.ends_with(".tif") || path.ends_with(".tiff") {
        DataSourceKind::Tiff
    } else {
        DataSourceKind::Zarr
    }
}

pub fn parse_data_sources<S: AsRef<str>>(urls: &[S]) -> Vec<DataSource> {
    urls.iter()
        .map(|url| url.as_ref().trim())
        .filter(|url| !url.is_empty())
        .map(DataSource::new)
        .collect()
}

/// Multiple sources only combine when they share a loader.
pub fn is_valid_combination(sources: &[DataSource]) -> bool {
    sources
        .windows(2)
        .all(|pair| pair[0].kind == pair[1].kind)
}
