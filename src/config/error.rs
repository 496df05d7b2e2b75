//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Expiry window must be greater than zero")]
    InvalidExpiry,

    #[error("Path must not be empty: {0}")]
    EmptyPath(&'static str),

    #[error("Platform id must not be blank: {0}")]
    InvalidPlatformId(&'static str),

    #[error("Display name limit must be greater than zero")]
    InvalidDisplayNameLimit,

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Invalid Stripe webhook secret format")]
    InvalidStripeWebhookSecret,

    #[error("Currency must be a three-letter ISO code")]
    InvalidCurrency,

    #[error("At least one payment method type is required")]
    NoPaymentMethods,

    #[error("Invalid callback timeout")]
    InvalidCallbackTimeout,
}
