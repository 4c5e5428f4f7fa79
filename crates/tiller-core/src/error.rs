//! Error types shared by the Tiller crates.

use thiserror::Error;

/// Result type alias for Tiller operations.
pub type TillerResult<T> = Result<T, TillerError>;

/// Errors that can occur while reading, balancing, or writing an assignment.
#[derive(Debug, Error)]
pub enum TillerError {
    #[error("invalid bucket count: {0} (must be at least 1)")]
    InvalidBucketCount(i64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse document: {0}")]
    Parse(String),

    #[error("failed to serialize document: {0}")]
    Serialize(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("test root not found: {0}")]
    TestRootNotFound(String),
}
