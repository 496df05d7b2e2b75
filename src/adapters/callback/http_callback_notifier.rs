//! Delivers payment outcomes to caller-supplied URLs over HTTP.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::payment::CallbackPayload;
use crate::ports::{CallbackError, CallbackNotifier};

/// POSTs the payload as JSON. Only `200 OK` counts as delivered.
#[derive(Debug, Clone)]
pub struct HttpCallbackNotifier {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpCallbackNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), timeout)
    }

    pub fn with_client(http_client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

#[async_trait]
impl CallbackNotifier for HttpCallbackNotifier {
    async fn notify(&self, url: &str, payload: &CallbackPayload) -> Result<(), CallbackError> {
        let response = self
            .http_client
            .post(url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(payment_id = %payload.payment_id, error = %e, "Callback transport failed");
                CallbackError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(
                payment_id = %payload.payment_id,
                status = status.as_u16(),
                "Callback rejected"
            );
            return Err(CallbackError::Rejected(status.as_u16()));
        }

        tracing::info!(
            payment_id = %payload.payment_id,
            outcome = payload.status,
            "Callback delivered"
        );
        Ok(())
    }
}
