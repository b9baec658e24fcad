mod catalog;
mod config;
mod error;
mod load_error;
mod session;
mod sources;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogFileInfo, CatalogRequest, DatasetCatalog, DatasetSummary, StaticCatalog,
    StaticDataset, resolve_catalog_request,
};
pub use config::{ViewerConfig, ViewerSnapshot, load_config, load_document, save_document};
pub use error::{Result, RuntimeError};
pub use load_error::{LoadError, LoadErrorKind, LoadErrorQueue};
pub use session::{ViewerSession, normalize_share_params};
pub use sources::{DataSource, DataSourceKind, is_valid_combination, parse_data_sources};
