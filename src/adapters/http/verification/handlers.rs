//! HTTP handlers for verification endpoints.
//!
//! These handlers connect Axum routes to the verification command/query handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::{
    ClaimIdentityCommand, ClaimIdentityHandler, ClearLedgerHandler, ConfirmVerificationCommand,
    ConfirmVerificationHandler, ListSessionsHandler, ReadLogHandler, SubmitSecretCommand,
    SubmitSecretHandler,
};
use crate::domain::foundation::{PlatformId, SessionId};
use crate::domain::verification::{
    ClaimResult, ConfirmTarget, MatchingEngine, PendingSecretLedger, PrivilegeGrantOrchestrator,
    VerificationError,
};

use super::super::error::{ApiError, ApiJson};
use super::dto::{
    ClaimRequestBody, ClaimResponse, ClearLogsResponse, ConfirmVerificationRequest,
    ConfirmVerificationResponse, LogsResponse, SessionsResponse, SubmitSecretRequest,
    SubmitSecretResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the verification routes.
#[derive(Clone)]
pub struct VerificationAppState {
    pub engine: Arc<MatchingEngine>,
    pub orchestrator: Arc<PrivilegeGrantOrchestrator>,
    /// Platform id of the acting bot account.
    pub agent_id: Option<PlatformId>,
    /// Include raw error detail in error bodies.
    pub expose_error_details: bool,
}

impl VerificationAppState {
    pub fn ledger(&self) -> PendingSecretLedger {
        self.engine.ledger().clone()
    }

    pub fn submit_handler(&self) -> SubmitSecretHandler {
        SubmitSecretHandler::new(self.ledger())
    }

    pub fn claim_handler(&self) -> ClaimIdentityHandler {
        ClaimIdentityHandler::new(
            self.engine.clone(),
            self.orchestrator.clone(),
            self.agent_id.clone(),
        )
    }

    pub fn confirm_handler(&self) -> ConfirmVerificationHandler {
        ConfirmVerificationHandler::new(self.ledger())
    }

    pub fn list_sessions_handler(&self) -> ListSessionsHandler {
        ListSessionsHandler::new(self.ledger())
    }

    pub fn read_log_handler(&self) -> ReadLogHandler {
        ReadLogHandler::new(self.ledger())
    }

    pub fn clear_handler(&self) -> ClearLedgerHandler {
        ClearLedgerHandler::new(self.ledger())
    }

    fn reject(&self, err: VerificationError) -> ApiError {
        ApiError::from(err).exposing_details(self.expose_error_details)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /verify - Record a secret submitted from the game
pub async fn submit_secret(
    State(state): State<VerificationAppState>,
    ApiJson(request): ApiJson<SubmitSecretRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SubmitSecretCommand {
        game_identity: request.username,
        secret: request.secret,
    };

    let result = state
        .submit_handler()
        .handle(cmd)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(SubmitSecretResponse::from(result)))
}

/// POST /verify/claim - Claim a game identity for a platform account
///
/// Every outcome uses the claim body. Conflicts answer 400 and a missing
/// match answers 404.
pub async fn claim_identity(
    State(state): State<VerificationAppState>,
    ApiJson(request): ApiJson<ClaimRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ClaimIdentityCommand {
        platform_id: request.platform_id,
        platform_display_name: request.platform_display_name,
        game_identity: request.username,
        secret: request.secret,
    };

    let outcome = state
        .claim_handler()
        .handle(cmd)
        .await
        .map_err(|e| state.reject(e))?;

    let status = match outcome.result {
        ClaimResult::Success(_) => StatusCode::OK,
        ClaimResult::NoMatch => StatusCode::NOT_FOUND,
        ClaimResult::AlreadyVerified | ClaimResult::IdentityTaken => StatusCode::BAD_REQUEST,
    };

    Ok((status, Json(ClaimResponse::from(&outcome))))
}

/// POST /confirm-verification - Consume a pending submission by session or username
pub async fn confirm_verification(
    State(state): State<VerificationAppState>,
    ApiJson(request): ApiJson<ConfirmVerificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = request.session_id.filter(|s| !s.trim().is_empty());
    let username = request.username.filter(|s| !s.is_empty());

    let target = match (session_id, username) {
        (Some(raw), _) => match SessionId::from_str(raw.trim()) {
            Ok(id) => ConfirmTarget::Session(id),
            Err(_) => return Err(state.reject(VerificationError::not_found(raw))),
        },
        (None, Some(username)) => ConfirmTarget::GameIdentity(username),
        (None, None) => {
            return Err(ApiError::bad_request(
                "Either session_id or username is required",
            ))
        }
    };

    let result = state
        .confirm_handler()
        .handle(ConfirmVerificationCommand { target })
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(ConfirmVerificationResponse {
        success: true,
        message: "Verification confirmed and data deleted successfully!".to_string(),
        session_id: result.session_id.to_string(),
        username: result.game_identity,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Diagnostics
// ════════════════════════════════════════════════════════════════════════════════

/// GET /sessions - List pending submissions
pub async fn list_sessions(State(state): State<VerificationAppState>) -> impl IntoResponse {
    let result = state.list_sessions_handler().handle().await;
    Json(SessionsResponse::from(result))
}

/// GET /logs - Raw durable log contents
pub async fn read_logs(
    State(state): State<VerificationAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .read_log_handler()
        .handle()
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(LogsResponse::from(result)))
}

/// DELETE /logs - Clear the ledger, the durable log, and every timer
pub async fn clear_logs(
    State(state): State<VerificationAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .clear_handler()
        .handle()
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(ClearLogsResponse {
        success: true,
        message: "All logs and sessions cleared".to_string(),
        cleared_sessions: result.cleared_sessions,
    }))
}
