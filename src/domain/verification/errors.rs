//! Verification-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | NotFound | 404 |
//! | AlreadyConsumed | 400 |
//! | Storage | 500 |
//! | Platform | 502 (never escapes the grant step in practice) |
//!
//! Claim conflicts (already verified, identity taken) are not errors: they
//! are [`ClaimResult`](super::ClaimResult) variants.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::ports::{PlatformError, StorageError};

/// Errors raised by the verification pipeline.
#[derive(Debug, Clone, Error)]
pub enum VerificationError {
    /// Malformed caller input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No outstanding submission matches the lookup.
    #[error("No pending verification found for {0}")]
    NotFound(String),

    /// The submission was already confirmed.
    #[error("Verification for {0} was already confirmed")]
    AlreadyConsumed(String),

    /// Durable storage failed.
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    /// The chat platform refused or failed a capability-gated action.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl VerificationError {
    pub fn not_found(what: impl Into<String>) -> Self {
        VerificationError::NotFound(what.into())
    }

    pub fn already_consumed(what: impl Into<String>) -> Self {
        VerificationError::AlreadyConsumed(what.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            VerificationError::Validation(err) => ErrorCode::from(err),
            VerificationError::NotFound(_) => ErrorCode::SessionNotFound,
            VerificationError::AlreadyConsumed(_) => ErrorCode::AlreadyConsumed,
            VerificationError::Storage(_) => ErrorCode::StorageError,
            VerificationError::Platform(_) => ErrorCode::PlatformError,
        }
    }

    /// Message safe to show to callers. Storage details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            VerificationError::Storage(_) | VerificationError::Platform(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}
