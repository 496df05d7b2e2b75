//! Errors for payment relay operations.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::ports::{PaymentError, PaymentErrorCode, StorageError};

/// Errors from creating, looking up, or deleting tracked payments.
#[derive(Debug, Clone, Error)]
pub enum PaymentRelayError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Payment not found: {0}")]
    NotFound(String),

    #[error("Payment provider error: {0}")]
    Provider(#[from] PaymentError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl PaymentRelayError {
    pub fn not_found(payment_id: impl Into<String>) -> Self {
        PaymentRelayError::NotFound(payment_id.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PaymentRelayError::Validation(err) => ErrorCode::from(err),
            PaymentRelayError::NotFound(_) => ErrorCode::PaymentNotFound,
            PaymentRelayError::Provider(err) if err.code == PaymentErrorCode::InvalidRequest => {
                ErrorCode::ValidationFailed
            }
            PaymentRelayError::Provider(_) => ErrorCode::PaymentProviderError,
            PaymentRelayError::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// Message safe to show to callers.
    pub fn public_message(&self) -> String {
        match self {
            PaymentRelayError::Validation(err) => err.to_string(),
            PaymentRelayError::NotFound(_) => "Payment not found".to_string(),
            PaymentRelayError::Provider(err) if err.code == PaymentErrorCode::InvalidRequest => {
                err.message.clone()
            }
            PaymentRelayError::Provider(_) => "Failed to create payment".to_string(),
            PaymentRelayError::Storage(_) => "Internal server error".to_string(),
        }
    }
}
