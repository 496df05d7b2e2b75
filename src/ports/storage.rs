//! Storage error shared by the file-backed ports.

use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// Errors from durable storage (allowlist file, secret log).
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Filesystem read or write failed.
    #[error("IO error: {0}")]
    Io(String),

    /// Content could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The caller handed over data that violates a store invariant.
    #[error("Invalid data: {0}")]
    Validation(#[from] ValidationError),
}

impl StorageError {
    pub fn io(message: impl Into<String>) -> Self {
        StorageError::Io(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        StorageError::Serialization(message.into())
    }
}
