//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `verification` - Pending secrets, the allowlist, and the claim pipeline
//! - `payment` - Payment requests, their status machine, and Stripe webhooks

pub mod foundation;
pub mod payment;
pub mod verification;
