use crate::codec::CodecError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("share link error: {0}")]
    Codec(#[from] CodecError),

    #[error("configuration I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration JSON failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("configuration YAML failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("dataset catalog failure: {0}")]
    Catalog(String),
}
