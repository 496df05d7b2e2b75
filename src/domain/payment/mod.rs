//! Payment relay domain.
//!
//! Tracks PromptPay payment intents created for game-side callers and the
//! outcome Stripe reports for each through webhooks. State is in memory only.

mod amount;
mod callback;
mod errors;
mod request;
mod status;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use amount::{Money, MAX_MINOR_UNITS};
pub use callback::CallbackPayload;
pub use errors::PaymentRelayError;
pub use request::{
    validate_callback_url, validate_caller_identity, PaymentRequest, Transition,
    TransitionError, DEFAULT_FAILURE_REASON,
};
pub use status::PaymentStatus;
pub use stripe_event::{
    StripeEvent, StripeEventData, StripeEventType, StripePaymentError, StripePaymentIntent,
};
#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{signature_header_for, SignatureHeader, StripeWebhookVerifier};
