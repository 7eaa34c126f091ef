//! Errors raised inside the extraction layer.
//!
//! These never cross [`TextExtractor::extract`](crate::TextExtractor::extract): the boundary
//! logs them and yields an empty string. Callers that want the reason use
//! [`FileTextExtractor::try_extract`](crate::FileTextExtractor::try_extract).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("file size {size} exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Io(err.to_string())
    }
}
