//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration, including:
//! - PromptPay payment intent creation
//! - Webhook signature verification
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window)
//! - All secrets are handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! Required environment variables:
//! - `IDENTITY_LINK__PAYMENT__STRIPE_API_KEY`: Stripe secret API key
//! - `IDENTITY_LINK__PAYMENT__STRIPE_WEBHOOK_SECRET`: Webhook signing secret (whsec_...)

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
