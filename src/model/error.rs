use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown view mode: {0}")]
    UnknownViewMode(String),

    #[error("unknown render mode: {0}")]
    UnknownRenderMode(String),

    #[error("unknown image type: {0}")]
    UnknownImageType(String),

    #[error("invalid channel pattern `{pattern}`: {reason}")]
    InvalidChannelPattern { pattern: String, reason: String },
}
