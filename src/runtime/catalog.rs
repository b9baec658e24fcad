use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::codec::CatalogParams;
use crate::model::ImageType;

use super::{Result, RuntimeError};

/// Legacy `dataset` + `id` lookup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRequest {
    pub dataset: String,
    pub cell_id: String,
}

impl From<CatalogParams> for CatalogRequest {
    fn from(params: CatalogParams) -> Self {
        Self {
            dataset: params.dataset,
            cell_id: params.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub id: String,
    pub name: String,
    /// Reference passed to [`DatasetCatalog::select_dataset`].
    pub manifest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFileInfo {
    pub cell_id: String,
    /// Segmented single-cell volume.
    pub volume_url: String,
    /// Full field of view containing the cell, when published.
    #[serde(default)]
    pub fov_volume_url: Option<String>,
}

impl CatalogFileInfo {
    pub fn volume_for(&self, image_type: ImageType) -> &str {
        match (image_type, &self.fov_volume_url) {
            (ImageType::FullField, Some(fov)) => fov,
            _ => &self.volume_url,
        }
    }
}

/// Remote dataset catalog used by legacy links.
pub trait DatasetCatalog {
    fn datasets(&self) -> Result<Vec<DatasetSummary>>;
    fn select_dataset(&mut self, manifest: &str) -> Result<()>;
    fn file_info(&self, cell_id: &str) -> Result<CatalogFileInfo>;
}

fn lookup(catalog: &mut dyn DatasetCatalog, request: &CatalogRequest) -> Result<CatalogFileInfo> {
    let dataset = catalog
        .datasets()?
        .into_iter()
        .find(|dataset| dataset.id == request.dataset || dataset.name == request.dataset)
        .ok_or_else(|| RuntimeError::Catalog(format!("no dataset `{}`", request.dataset)))?;
    debug!("selecting dataset {} ({})", dataset.id, dataset.manifest);
    catalog.select_dataset(&dataset.manifest)?;
    catalog.file_info(&request.cell_id)
}

/// Looks up the file for `request`. Failures are logged and yield `None`;
/// the viewer then simply shows no image.
pub fn resolve_catalog_request(
    catalog: &mut dyn DatasetCatalog,
    request: &CatalogRequest,
) -> Option<CatalogFileInfo> {
    match lookup(catalog, request) {
        Ok(info) => Some(info),
        Err(err) => {
            error!(
                "catalog lookup for {}/{} failed: {err}",
                request.dataset, request.cell_id
            );
            None
        }
    }
}

/// In-memory catalog, loadable from a JSON or YAML document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticCatalog {
    pub datasets: Vec<StaticDataset>,
    #[serde(skip)]
    selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticDataset {
    #[serde(flatten)]
    pub summary: DatasetSummary,
    #[serde(default)]
    pub files: Vec<CatalogFileInfo>,
}

impl StaticCatalog {
    pub fn new(datasets: Vec<StaticDataset>) -> Self {
        Self {
            datasets,
            selected: None,
        }
    }
}

impl DatasetCatalog for StaticCatalog {
    fn datasets(&self) -> Result<Vec<DatasetSummary>> {
        Ok(self
            .datasets
            .iter()
            .map(|dataset| dataset.summary.clone())
            .collect())
    }

    fn select_dataset(&mut self, manifest: &str) -> Result<()> {
        let index = self
            .datasets
            .iter()
            .position(|dataset| dataset.summary.manifest == manifest)
            .ok_or_else(|| RuntimeError::Catalog(format!("unknown manifest `{manifest}`")))?;
        self.selected = Some(index);
        Ok(())
    }

    fn file_info(&self, cell_id: &str) -> Result<CatalogFileInfo> {
        let dataset = self
            .selected
            .and_then(|index| self.datasets.get(index))
            .ok_or_else(|| RuntimeError::Catalog("no dataset selected".to_string()))?;
        dataset
            .files
            .iter()
            .find(|file| file.cell_id == cell_id)
            .cloned()
            .ok_or_else(|| RuntimeError::Catalog(format!("no cell `{cell_id}`")))
    }
}
