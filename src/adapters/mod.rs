//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Allowlist JSON file and secret log file, plus in-memory variants
//! - `platform` - Chat-platform gateways (detached, recording)
//! - `stripe` - Stripe REST adapter and mock provider
//! - `payment` - Tracked payment repository
//! - `callback` - Outbound outcome delivery
//! - `http` - Axum routes

pub mod callback;
pub mod http;
pub mod payment;
pub mod platform;
pub mod storage;
pub mod stripe;
