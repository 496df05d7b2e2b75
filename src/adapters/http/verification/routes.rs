//! Axum router configuration for verification endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    claim_identity, clear_logs, confirm_verification, list_sessions, read_logs, submit_secret,
    VerificationAppState,
};

/// Create the verification router.
///
/// # Routes
///
/// ## Game-facing
/// - `POST /verify` - Submit a username and secret
///
/// ## Platform-facing
/// - `POST /verify/claim` - Claim a pending submission for a platform account
/// - `POST /confirm-verification` - Consume a submission without linking
///
/// ## Diagnostics
/// - `GET /sessions` - List pending submissions
/// - `GET /logs` - Raw durable log
/// - `DELETE /logs` - Clear everything
pub fn verification_router() -> Router<VerificationAppState> {
    Router::new()
        .route("/verify", post(submit_secret))
        .route("/verify/claim", post(claim_identity))
        .route("/confirm-verification", post(confirm_verification))
        .route("/sessions", get(list_sessions))
        .route("/logs", get(read_logs).delete(clear_logs))
}
