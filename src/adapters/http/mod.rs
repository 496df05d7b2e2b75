//! HTTP adapters - REST API implementations.
//!
//! Each area has its own module with dto, handlers, and routes. `router`
//! merges them under one middleware stack.

pub mod error;
pub mod health;
pub mod payment;
pub mod router;
pub mod verification;

pub use error::{ApiError, ApiJson, ErrorResponse};
pub use payment::{payment_router, PaymentAppState};
pub use router::app_router;
pub use verification::{verification_router, VerificationAppState};
