//! Application configuration
//!
//! Loaded from environment variables prefixed `IDENTITY_LINK`, with `__`
//! separating nested keys. A `.env` file is read first when present.
//!
//! ```text
//! IDENTITY_LINK__SERVER__PORT=3000
//! IDENTITY_LINK__VERIFICATION__EXPIRY_SECS=120
//! IDENTITY_LINK__PLATFORM__VERIFIED_ROLE_ID=1234
//! IDENTITY_LINK__PAYMENT__STRIPE_API_KEY=sk_test_...
//! ```

mod error;
mod payment;
mod platform;
mod server;
mod verification;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use platform::PlatformConfig;
pub use server::{Environment, ServerConfig};
pub use verification::VerificationConfig;

use serde::Deserialize;

const ENV_PREFIX: &str = "IDENTITY_LINK";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Pending-secret ledger and allowlist settings
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Chat-platform settings
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Stripe relay; absent disables the payment routes
    #[serde(default)]
    pub payment: Option<PaymentConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads from `.env` file if present, then reads environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validate all configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.verification.validate()?;
        self.platform.validate()?;
        if let Some(payment) = &self.payment {
            payment.validate()?;
        }
        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Tests that touch the process environment run one at a time
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        let keys: Vec<String> = env::vars()
            .map(|(k, _)| k)
            .filter(|k| k.starts_with("IDENTITY_LINK__"))
            .collect();
        for key in keys {
            env::remove_var(key);
        }
    }

    fn set_env(pairs: &[(&str, &str)]) {
        for (key, value) in pairs {
            env::set_var(key, value);
        }
    }

    #[test]
    fn test_load_defaults_without_env() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.verification.expiry_secs, 120);
        assert!(config.platform.verified_role_id.is_none());
        assert!(config.payment.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        set_env(&[
            ("IDENTITY_LINK__SERVER__PORT", "8080"),
            ("IDENTITY_LINK__SERVER__ENVIRONMENT", "production"),
            ("IDENTITY_LINK__VERIFICATION__EXPIRY_SECS", "30"),
            ("IDENTITY_LINK__VERIFICATION__REPLAY_LOG_ON_STARTUP", "false"),
            ("IDENTITY_LINK__PLATFORM__VERIFIED_ROLE_ID", "555"),
            ("IDENTITY_LINK__PAYMENT__STRIPE_API_KEY", "sk_test_abc"),
            ("IDENTITY_LINK__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_abc"),
        ]);

        let result = AppConfig::load();
        clear_env();
        let config = result.unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.is_production());
        assert_eq!(config.verification.expiry_secs, 30);
        assert!(!config.verification.replay_log_on_startup);
        assert_eq!(config.platform.verified_role_id.as_deref(), Some("555"));
        let payment = config.payment.unwrap();
        assert_eq!(payment.stripe_api_key.expose_secret(), "sk_test_abc");
        assert_eq!(payment.currency, "thb");
    }

    #[test]
    fn test_validate_rejects_bad_payment_section() {
        let config = AppConfig {
            payment: Some(PaymentConfig::new("nope", "whsec_abc")),
            ..Default::default()
        };

        assert_eq!(config.validate(), Err(ValidationError::InvalidStripeKey));
    }

    #[test]
    fn test_validate_rejects_zero_expiry() {
        let mut config = AppConfig::default();
        config.verification.expiry_secs = 0;

        assert_eq!(config.validate(), Err(ValidationError::InvalidExpiry));
    }
}
