//! identity-link server binary.

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use identity_link::adapters::callback::HttpCallbackNotifier;
use identity_link::adapters::http::{app_router, PaymentAppState, VerificationAppState};
use identity_link::adapters::payment::InMemoryPaymentRepository;
use identity_link::adapters::platform::DetachedPlatformGateway;
use identity_link::adapters::storage::{FileSecretLog, JsonAllowlistStore};
use identity_link::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use identity_link::application::PaymentIntentSettings;
use identity_link::config::{AppConfig, PaymentConfig, ServerConfig};
use identity_link::domain::verification::{
    ExpirySupervisor, MatchingEngine, PendingSecretLedger, PrivilegeGrantOrchestrator,
};
use identity_link::ports::AllowlistStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    install_panic_hook();

    if let Err(err) = config.validate() {
        tracing::error!(error = %err, "Invalid configuration");
        return Err(err.into());
    }

    // Verification pipeline
    let verification = &config.verification;
    let ledger = PendingSecretLedger::new(
        Arc::new(FileSecretLog::new(&verification.secret_log_path)),
        ExpirySupervisor::new(),
        verification.expiry(),
    );
    if verification.replay_log_on_startup {
        if let Err(err) = ledger.replay().await {
            tracing::warn!(error = %err, "Secret log replay failed, starting empty");
        }
    }

    let store = Arc::new(JsonAllowlistStore::new(&verification.allowlist_path));
    match store.load().await {
        Ok(entries) => tracing::info!(
            path = %verification.allowlist_path.display(),
            entries = entries.len(),
            "Allowlist ready"
        ),
        Err(err) => tracing::warn!(error = %err, "Allowlist could not be read at startup"),
    }

    let engine = Arc::new(MatchingEngine::new(store, ledger.clone()));
    let orchestrator = Arc::new(
        PrivilegeGrantOrchestrator::new(
            Arc::new(DetachedPlatformGateway::new()),
            config.platform.verified_role()?,
        )
        .with_max_label_chars(config.platform.max_display_name_len),
    );

    let expose_error_details = config.server.exposes_error_details();
    let verification_state = VerificationAppState {
        engine,
        orchestrator,
        agent_id: config.platform.agent()?,
        expose_error_details,
    };

    // Payment relay
    let payment_state = config
        .payment
        .as_ref()
        .map(|payment| payment_state(payment, expose_error_details));
    if payment_state.is_none() {
        tracing::info!("No payment configuration, payment routes disabled");
    }

    let app = app_router(verification_state, payment_state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let cancelled = ledger.shutdown();
    tracing::info!(cancelled_timers = cancelled, "Server stopped");
    Ok(())
}

fn payment_state(payment: &PaymentConfig, expose_error_details: bool) -> PaymentAppState {
    let stripe = StripeConfig::from_secrets(
        payment.stripe_api_key.clone(),
        payment.stripe_webhook_secret.clone(),
    )
    .with_require_livemode(payment.require_livemode);

    tracing::info!(
        live = payment.is_live_mode(),
        currency = %payment.currency,
        "Payment relay enabled"
    );

    PaymentAppState {
        provider: Arc::new(StripePaymentAdapter::new(stripe)),
        repository: Arc::new(InMemoryPaymentRepository::new()),
        notifier: Arc::new(HttpCallbackNotifier::new(payment.callback_timeout())),
        settings: PaymentIntentSettings {
            currency: payment.currency.clone(),
            payment_method_types: payment.payment_method_types_list(),
        },
        expose_error_details,
    }
}

/// `RUST_LOG` wins over the configured filter. JSON output in production.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Panics are logged; the runtime keeps serving other requests.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "Unhandled panic");
    }));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
