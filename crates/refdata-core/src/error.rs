//! Core error types.

use thiserror::Error;

/// Core reference-data store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Key decoding error.
    #[error("invalid key format")]
    InvalidKey,

    /// No catalog matches the requested identifier/version/date.
    #[error("catalog not found")]
    NotFound,

    /// An `(identifier, version)` pair already exists.
    #[error("catalog '{identifier}' already has a version '{version}'")]
    Conflict {
        /// Catalog identifier.
        identifier: String,
        /// Duplicate version string.
        version: String,
    },
}
