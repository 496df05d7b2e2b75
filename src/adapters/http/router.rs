//! Assembles the full application router and its middleware stack.

use std::time::Instant;

use axum::Router;
use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::health::{health_router, HealthState};
use super::payment::{payment_router, PaymentAppState};
use super::verification::{verification_router, VerificationAppState};

/// Builds the application router.
///
/// Payment routes are mounted only when `payment` is given.
pub fn app_router(
    verification: VerificationAppState,
    payment: Option<PaymentAppState>,
    server: &ServerConfig,
) -> Router {
    let health = HealthState {
        ledger: verification.ledger(),
        started_at: Instant::now(),
        payment_enabled: payment.is_some(),
    };

    let mut router = Router::new()
        .merge(health_router().with_state(health))
        .merge(verification_router().with_state(verification));

    if let Some(payment) = payment {
        router = router.merge(payment_router().with_state(payment));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::new())
            .layer(TimeoutLayer::new(server.request_timeout()))
            .layer(cors_layer(&server.cors_origins_list())),
    )
}

/// Any origin when none are configured, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
