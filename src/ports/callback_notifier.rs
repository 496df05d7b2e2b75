//! Callback notifier port - delivers payment outcomes to the caller.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::payment::CallbackPayload;

/// Failure to deliver a callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// The request never got a response (connect, TLS, timeout).
    #[error("Callback transport failed: {0}")]
    Transport(String),

    /// The receiver answered with something other than 200.
    #[error("Callback rejected with status {0}")]
    Rejected(u16),
}

/// Port for outbound outcome delivery.
#[async_trait]
pub trait CallbackNotifier: Send + Sync {
    /// POST `payload` as JSON to `url`. Only a 200 response counts as
    /// delivered.
    async fn notify(&self, url: &str, payload: &CallbackPayload) -> Result<(), CallbackError>;
}
