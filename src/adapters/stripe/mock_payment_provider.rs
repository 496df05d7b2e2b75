//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured responses
//! - Error injection
//! - Call tracking
//! - Webhook event simulation

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::payment::WebhookError;
use crate::ports::{
    CreatePaymentIntentRequest, PaymentError, PaymentIntent, PaymentIntentEventData,
    PaymentProvider, WebhookEvent, WebhookEventType,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Inject errors
/// mock.set_error(PaymentError::network("Stripe unreachable"));
///
/// // Simulate a webhook delivery
/// mock.set_webhook_event(MockPaymentProvider::succeeded_event("pi_123"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Next intent to return from `create_payment_intent`.
    next_intent: Option<PaymentIntent>,

    /// Every intent request received, in order.
    intent_requests: Vec<CreatePaymentIntentRequest>,

    /// Next webhook event to return.
    next_webhook_event: Option<WebhookEvent>,

    /// Webhook verification error, returned on every call while set.
    webhook_error: Option<WebhookError>,

    /// Error to return on next call (consumed).
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks() -> Self {
        let mock = Self::new();
        mock.set_webhook_error(WebhookError::InvalidSignature);
        mock
    }

    /// `payment_intent.succeeded` for `intent_id`.
    pub fn succeeded_event(intent_id: &str) -> WebhookEvent {
        Self::intent_event(WebhookEventType::PaymentSucceeded, intent_id, None)
    }

    /// `payment_intent.payment_failed` for `intent_id`.
    pub fn failed_event(intent_id: &str, message: Option<&str>) -> WebhookEvent {
        Self::intent_event(
            WebhookEventType::PaymentFailed,
            intent_id,
            message.map(str::to_string),
        )
    }

    /// `payment_intent.canceled` for `intent_id`.
    pub fn canceled_event(intent_id: &str) -> WebhookEvent {
        Self::intent_event(WebhookEventType::PaymentCanceled, intent_id, None)
    }

    fn intent_event(
        event_type: WebhookEventType,
        intent_id: &str,
        failure_message: Option<String>,
    ) -> WebhookEvent {
        WebhookEvent {
            id: format!("evt_mock_{}", short_id()),
            event_type,
            payment_intent: Some(PaymentIntentEventData {
                intent_id: intent_id.to_string(),
                failure_message,
            }),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the intent to return on the next `create_payment_intent` call.
    pub fn set_intent(&self, intent: PaymentIntent) {
        self.state().next_intent = Some(intent);
    }

    /// Set the webhook event to return on verification.
    pub fn set_webhook_event(&self, event: WebhookEvent) {
        self.state().next_webhook_event = Some(event);
    }

    pub fn set_webhook_error(&self, error: WebhookError) {
        self.state().webhook_error = Some(error);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
        state.webhook_error = None;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// The most recent intent request.
    pub fn last_intent_request(&self) -> Option<CreatePaymentIntentRequest> {
        self.state().intent_requests.last().cloned()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record_call(
            "create_payment_intent",
            vec![request.username.clone(), request.amount_minor.to_string()],
        );
        self.check_error("create_payment_intent")?;

        let mut state = self.state();
        let intent = state.next_intent.take().unwrap_or_else(|| {
            let id = format!("pi_mock_{}", short_id());
            PaymentIntent {
                client_secret: Some(format!("{}_secret_mock", id)),
                id,
                status: "requires_payment_method".to_string(),
                amount_minor: request.amount_minor,
            }
        });
        state.intent_requests.push(request);

        Ok(intent)
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, WebhookError> {
        self.record_call(
            "verify_webhook",
            vec![payload.len().to_string(), signature.to_string()],
        );

        let mut state = self.state();
        if let Some(error) = &state.webhook_error {
            return Err(error.clone());
        }

        Ok(state.next_webhook_event.take().unwrap_or_else(|| WebhookEvent {
            id: format!("evt_mock_{}", short_id()),
            event_type: WebhookEventType::Unknown("mock.event".to_string()),
            payment_intent: None,
            created_at: chrono::Utc::now().timestamp(),
        }))
    }
}
