//! Webhook error types.
//!
//! Every error maps to the status code Stripe sees, which decides whether
//! Stripe retries delivery.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while receiving a payment webhook.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// The `Stripe-Signature` header was absent.
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    /// Signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is older than the accepted window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Webhook timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Payload or header could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A test-mode event reached a deployment that requires live mode.
    #[error("Test mode events are not accepted")]
    LivemodeMismatch,

    /// The caller's callback endpoint did not accept the outcome.
    #[error("Callback delivery failed: {0}")]
    CallbackFailed(String),

    /// Tracked payment state could not be read or written.
    #[error("Processing failed: {0}")]
    Processing(String),

    /// Event was intentionally not processed.
    #[error("Event ignored: {0}")]
    Ignored(String),
}

impl WebhookError {
    /// Whether Stripe should redeliver the event.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::CallbackFailed(_) | WebhookError::Processing(_)
        )
    }

    /// Status code returned to Stripe.
    ///
    /// - 2xx: acknowledged, no retry
    /// - 4xx: rejected, no retry
    /// - 5xx: retried
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_)
            | WebhookError::LivemodeMismatch => StatusCode::BAD_REQUEST,

            WebhookError::Ignored(_) => StatusCode::OK,

            WebhookError::CallbackFailed(_) | WebhookError::Processing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable error code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::TimestampOutOfRange | WebhookError::InvalidTimestamp => {
                "INVALID_TIMESTAMP"
            }
            WebhookError::ParseError(_) => "INVALID_PAYLOAD",
            WebhookError::LivemodeMismatch => "LIVEMODE_REQUIRED",
            WebhookError::CallbackFailed(_) => "CALLBACK_FAILED",
            WebhookError::Processing(_) => "PROCESSING_FAILED",
            WebhookError::Ignored(_) => "IGNORED",
        }
    }
}
