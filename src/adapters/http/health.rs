//! `GET /` health check.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::verification::PendingSecretLedger;

const VERIFICATION_ENDPOINTS: &[(&str, &str)] = &[
    ("POST /verify", "Submit player verification data"),
    ("POST /verify/claim", "Claim a pending verification for a platform account"),
    ("POST /confirm-verification", "Confirm verification and delete data"),
    ("GET /sessions", "View active sessions"),
    ("GET /logs", "View current logs"),
    ("DELETE /logs", "Clear all logs"),
    ("GET /", "Health check"),
];

const PAYMENT_ENDPOINTS: &[(&str, &str)] = &[
    ("POST /create-promptpay", "Create a PromptPay payment"),
    ("POST /webhook", "Stripe webhook receiver"),
    ("GET /payment-status/:payment_id", "Payment status"),
    ("DELETE /payment/:payment_id", "Delete a tracked payment"),
];

#[derive(Clone)]
pub struct HealthState {
    pub ledger: PendingSecretLedger,
    pub started_at: Instant,
    pub payment_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatistics {
    pub pending_timers: usize,
    pub active_sessions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime_secs: u64,
    pub endpoints: BTreeMap<String, String>,
    pub statistics: HealthStatistics,
}

pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    let stats = state.ledger.stats().await;

    let mut endpoints: BTreeMap<String, String> = VERIFICATION_ENDPOINTS
        .iter()
        .map(|(route, about)| (route.to_string(), about.to_string()))
        .collect();
    if state.payment_enabled {
        endpoints.extend(
            PAYMENT_ENDPOINTS
                .iter()
                .map(|(route, about)| (route.to_string(), about.to_string())),
        );
    }

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Timestamp::now().to_iso8601(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        endpoints,
        statistics: HealthStatistics {
            pending_timers: stats.pending_timers,
            active_sessions: stats.active_sessions,
        },
    })
}

pub fn health_router() -> Router<HealthState> {
    Router::new().route("/", get(health))
}
