//! Identity Link - game identity to chat-platform account linking
//!
//! A player submits a short-lived secret from the game, then claims it from
//! the chat platform. A match writes a durable allowlist entry and grants
//! the verified role. A separate relay creates Stripe PromptPay payments and
//! forwards their outcome to a caller-supplied callback URL.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
