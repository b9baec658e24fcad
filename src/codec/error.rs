use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

/// Whole-input failures. Individual malformed fields never error; they
/// decode to `None`.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid share URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
