use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("channel index {index} is out of range for {len} channels")]
    ChannelIndexOutOfRange { index: usize, len: usize },
}
