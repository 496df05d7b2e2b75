//! HTTP adapter for the Stripe PromptPay relay.
//!
//! Mounted only when a payment section is configured.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::PaymentAppState;
pub use routes::payment_router;
