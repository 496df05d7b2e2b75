//! HTTP adapter for verification endpoints.
//!
//! - `POST /verify` - Submit a secret from the game
//! - `POST /verify/claim` - Claim it from the chat platform
//! - `POST /confirm-verification` - Consume a submission manually
//! - `GET /sessions`, `GET /logs`, `DELETE /logs` - Diagnostics

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::VerificationAppState;
pub use routes::verification_router;
