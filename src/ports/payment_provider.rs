//! Payment provider port for external payment processing.
//!
//! Defines the contract for the payment gateway (Stripe): creating a
//! payment intent and turning a signed webhook delivery into an event.
//!
//! # Design
//!
//! - **Gateway agnostic**: callers only see intents and events
//! - **Idempotent**: intent creation accepts an idempotency key

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::WebhookError;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent the game client can confirm.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Verify a webhook signature and parse the event.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, WebhookError>;
}

/// Request to create a payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor currency units.
    pub amount_minor: u64,

    /// ISO currency code, lowercase (e.g. `thb`).
    pub currency: String,

    /// Allowed payment methods (e.g. `promptpay`).
    pub payment_method_types: Vec<String>,

    /// Game identity of the payer, stored as intent metadata.
    pub username: String,

    /// Callback URL, stored as intent metadata.
    pub callback_url: Option<String>,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Payment intent as created by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent id (`pi_...`).
    pub id: String,

    /// Secret the client uses to confirm the intent.
    pub client_secret: Option<String>,

    /// Provider status string (e.g. `requires_payment_method`).
    pub status: String,

    pub amount_minor: u64,
}

/// Webhook event from the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider.
    pub id: String,

    pub event_type: WebhookEventType,

    /// Intent the event is about, present for `payment_intent.*` events.
    pub payment_intent: Option<PaymentIntentEventData>,

    /// When the event occurred (Unix timestamp).
    pub created_at: i64,
}

/// Types of webhook events we handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    PaymentSucceeded,
    PaymentFailed,
    PaymentCanceled,
    /// Any other event type, by its provider name.
    Unknown(String),
}

/// Intent fields carried by a payment event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntentEventData {
    pub intent_id: String,
    /// Provider's last payment error message, for failures.
    pub failure_message: Option<String>,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::InvalidRequest => ErrorCode::ValidationFailed,
            _ => ErrorCode::PaymentProviderError,
        };
        DomainError::new(code, err.message)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Provider rejected the request parameters.
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }

    /// Maps a provider HTTP status to an error code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 402 | 404 => PaymentErrorCode::InvalidRequest,
            401 | 403 => PaymentErrorCode::AuthenticationError,
            429 => PaymentErrorCode::RateLimitExceeded,
            500..=599 => PaymentErrorCode::ProviderError,
            _ => PaymentErrorCode::Unknown,
        }
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
