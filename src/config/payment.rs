//! Payment relay configuration
//!
//! The whole section is optional. When no `IDENTITY_LINK__PAYMENT__*`
//! variables are set, the payment routes are not mounted.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Stripe and callback settings
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key (`sk_test_...` or `sk_live_...`)
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret (`whsec_...`)
    pub stripe_webhook_secret: SecretString,

    /// ISO currency code, lowercase
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Payment method types (comma-separated)
    #[serde(default = "default_payment_method_types")]
    pub payment_method_types: String,

    /// Reject webhook events whose livemode differs from the key's mode
    #[serde(default)]
    pub require_livemode: bool,

    /// Timeout for outbound callback POSTs, in seconds
    #[serde(default = "default_callback_timeout")]
    pub callback_timeout_secs: u64,
}

impl PaymentConfig {
    pub fn new(stripe_api_key: impl Into<String>, stripe_webhook_secret: impl Into<String>) -> Self {
        Self {
            stripe_api_key: SecretString::new(stripe_api_key.into()),
            stripe_webhook_secret: SecretString::new(stripe_webhook_secret.into()),
            currency: default_currency(),
            payment_method_types: default_payment_method_types(),
            require_livemode: false,
            callback_timeout_secs: default_callback_timeout(),
        }
    }

    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Payment method types as a vector
    pub fn payment_method_types_list(&self) -> Vec<String> {
        self.payment_method_types
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.stripe_api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("stripe_api_key"));
        }
        if !key.starts_with("sk_") && !key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }

        let secret = self.stripe_webhook_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("stripe_webhook_secret"));
        }
        if !secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.payment_method_types_list().is_empty() {
            return Err(ValidationError::NoPaymentMethods);
        }
        if self.callback_timeout_secs == 0 || self.callback_timeout_secs > 120 {
            return Err(ValidationError::InvalidCallbackTimeout);
        }

        Ok(())
    }
}

fn default_currency() -> String {
    "thb".to_string()
}

fn default_payment_method_types() -> String {
    "promptpay".to_string()
}

fn default_callback_timeout() -> u64 {
    10
}
