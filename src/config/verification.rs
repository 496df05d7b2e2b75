//! Verification configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Pending-secret ledger and allowlist settings
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// Durable mirror of pending secrets
    #[serde(default = "default_secret_log_path")]
    pub secret_log_path: PathBuf,

    /// Allowlist JSON file
    #[serde(default = "default_allowlist_path")]
    pub allowlist_path: PathBuf,

    /// Claim window in seconds
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,

    /// Restore still-live log lines into the ledger at startup
    #[serde(default = "default_replay")]
    pub replay_log_on_startup: bool,
}

impl VerificationConfig {
    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.expiry_secs == 0 {
            return Err(ValidationError::InvalidExpiry);
        }
        if self.secret_log_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyPath("secret_log_path"));
        }
        if self.allowlist_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyPath("allowlist_path"));
        }
        Ok(())
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            secret_log_path: default_secret_log_path(),
            allowlist_path: default_allowlist_path(),
            expiry_secs: default_expiry_secs(),
            replay_log_on_startup: default_replay(),
        }
    }
}

fn default_secret_log_path() -> PathBuf {
    PathBuf::from("memory-logs-verify.txt")
}

fn default_allowlist_path() -> PathBuf {
    PathBuf::from("data/Whitelist.json")
}

fn default_expiry_secs() -> u64 {
    120
}

fn default_replay() -> bool {
    true
}
