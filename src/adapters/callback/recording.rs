//! In-memory callback notifier for tests and local runs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::payment::CallbackPayload;
use crate::ports::{CallbackError, CallbackNotifier};

#[derive(Debug, Default)]
struct RecordingState {
    deliveries: Vec<(String, CallbackPayload)>,
    reject_with: Option<u16>,
}

/// Records every delivered callback instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct RecordingCallbackNotifier {
    inner: Arc<Mutex<RecordingState>>,
}

impl RecordingCallbackNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every callback with `status` instead of 200. `None` restores delivery.
    pub fn reject_with(&self, status: Option<u16>) {
        self.state().reject_with = status;
    }

    /// Delivered callbacks as `(url, payload)`, oldest first.
    pub fn deliveries(&self) -> Vec<(String, CallbackPayload)> {
        self.state().deliveries.clone()
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CallbackNotifier for RecordingCallbackNotifier {
    async fn notify(&self, url: &str, payload: &CallbackPayload) -> Result<(), CallbackError> {
        let mut state = self.state();
        if let Some(status) = state.reject_with {
            return Err(CallbackError::Rejected(status));
        }
        state.deliveries.push((url.to_string(), payload.clone()));
        Ok(())
    }
}
