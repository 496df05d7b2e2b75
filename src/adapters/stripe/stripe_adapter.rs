//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API.
//! Creates PromptPay payment intents and verifies webhook deliveries.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key, webhook_secret);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::payment::{
    StripeEvent, StripeEventType, StripePaymentIntent, StripeWebhookVerifier, WebhookError,
};
use crate::ports::{
    CreatePaymentIntentRequest, PaymentError, PaymentErrorCode, PaymentIntent,
    PaymentIntentEventData, PaymentProvider, WebhookEvent, WebhookEventType,
};

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Whether to reject test-mode webhook events.
    require_livemode: bool,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self::from_secrets(
            SecretString::new(api_key.into()),
            SecretString::new(webhook_secret.into()),
        )
    }

    pub fn from_secrets(api_key: SecretString, webhook_secret: SecretString) -> Self {
        Self {
            api_key,
            webhook_secret,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            require_livemode: false,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("require_livemode", &self.require_livemode)
            .finish()
    }
}

/// Error envelope Stripe returns on 4xx/5xx.
#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeApiError,
}

#[derive(Debug, Deserialize)]
struct StripeApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    verifier: StripeWebhookVerifier,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: StripeConfig, http_client: reqwest::Client) -> Self {
        let verifier = StripeWebhookVerifier::new(config.webhook_secret.clone());
        Self {
            config,
            verifier,
            http_client,
        }
    }

    /// Form body for `POST /v1/payment_intents`.
    fn intent_params(request: &CreatePaymentIntentRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("amount".to_string(), request.amount_minor.to_string()),
            ("currency".to_string(), request.currency.clone()),
            ("confirm".to_string(), "false".to_string()),
            ("metadata[username]".to_string(), request.username.clone()),
        ];

        for method in &request.payment_method_types {
            params.push(("payment_method_types[]".to_string(), method.clone()));
        }

        if let Some(callback_url) = &request.callback_url {
            params.push(("metadata[callback_url]".to_string(), callback_url.clone()));
        }

        params
    }

    async fn error_from_response(response: reqwest::Response) -> PaymentError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let code = PaymentErrorCode::from_http_status(status);

        match serde_json::from_str::<StripeErrorEnvelope>(&body) {
            Ok(envelope) => {
                let message = envelope
                    .error
                    .message
                    .unwrap_or_else(|| format!("Stripe API error (HTTP {})", status));
                let error = PaymentError::new(code, message);
                match envelope.error.code {
                    Some(provider_code) => error.with_provider_code(provider_code),
                    None => error,
                }
            }
            Err(_) => PaymentError::new(code, format!("Stripe API error (HTTP {}): {}", status, body)),
        }
    }

    /// Converts a verified Stripe event into the port's event type.
    fn to_webhook_event(&self, event: StripeEvent) -> Result<WebhookEvent, WebhookError> {
        if self.config.require_livemode && !event.is_live() {
            tracing::warn!(event_id = %event.id, "Rejected test mode event");
            return Err(WebhookError::LivemodeMismatch);
        }

        let event_type = match event.parsed_type() {
            StripeEventType::PaymentIntentSucceeded => WebhookEventType::PaymentSucceeded,
            StripeEventType::PaymentIntentPaymentFailed => WebhookEventType::PaymentFailed,
            StripeEventType::PaymentIntentCanceled => WebhookEventType::PaymentCanceled,
            StripeEventType::Unknown => WebhookEventType::Unknown(event.event_type.clone()),
        };

        let payment_intent = match event_type {
            WebhookEventType::Unknown(_) => None,
            _ => {
                let intent: StripePaymentIntent = event.deserialize_object().map_err(|e| {
                    WebhookError::ParseError(format!("Invalid payment intent: {}", e))
                })?;
                Some(PaymentIntentEventData {
                    failure_message: intent.failure_message(),
                    intent_id: intent.id,
                })
            }
        };

        Ok(WebhookEvent {
            id: event.id,
            event_type,
            payment_intent,
            created_at: event.created,
        })
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);
        let params = Self::intent_params(&request);

        let mut builder = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params);
        if let Some(key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let error = Self::error_from_response(response).await;
            tracing::error!(error = %error, "Stripe create_payment_intent failed");
            return Err(error);
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let amount_minor = u64::try_from(intent.amount).map_err(|_| {
            PaymentError::provider(format!("Stripe returned negative amount {}", intent.amount))
        })?;

        tracing::info!(intent_id = %intent.id, amount_minor, "Payment intent created");

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            status: intent.status.unwrap_or_default(),
            amount_minor,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, WebhookError> {
        let event = self.verifier.verify_and_parse(payload, signature)?;
        let webhook_event = self.to_webhook_event(event)?;

        tracing::info!(
            event_id = %webhook_event.id,
            event_type = ?webhook_event.event_type,
            "Webhook signature verified"
        );

        Ok(webhook_event)
    }
}
