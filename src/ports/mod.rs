//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Verification Ports
//!
//! - `AllowlistStore` - Durable record of verified identity links
//! - `SecretLog` - Line-oriented mirror of pending secrets
//! - `PlatformGateway` - Chat-platform capability queries and mutations
//!
//! ## Payment Ports
//!
//! - `PaymentProvider` - Payment intent creation and webhook verification
//! - `PaymentRepository` - Tracked payment requests
//! - `CallbackNotifier` - Outcome delivery to the caller's callback URL

mod allowlist_store;
mod callback_notifier;
mod payment_provider;
mod payment_repository;
mod platform_gateway;
mod secret_log;
mod storage;

pub use allowlist_store::AllowlistStore;
pub use callback_notifier::{CallbackError, CallbackNotifier};
pub use payment_provider::{
    CreatePaymentIntentRequest, PaymentError, PaymentErrorCode, PaymentIntent,
    PaymentIntentEventData, PaymentProvider, WebhookEvent, WebhookEventType,
};
pub use payment_repository::PaymentRepository;
pub use platform_gateway::{Capability, MemberRank, PlatformError, PlatformGateway};
pub use secret_log::SecretLog;
pub use storage::StorageError;
