//! Error types for the engine crate.
//!
//! Only document decoding can fail. Filter operations themselves degrade
//! to safe defaults instead of returning errors.

use thiserror::Error;

/// Errors raised while loading configuration or schema documents.
#[derive(Debug, Error)]
pub enum SifterError {
    /// The configuration document could not be decoded.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] serde_yaml::Error),

    /// The schema document could not be decoded.
    #[error("invalid schema document: {0}")]
    InvalidSchema(#[from] serde_json::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, SifterError>;
