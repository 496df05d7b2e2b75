//! HandlePaymentWebhookHandler - Command handler for Stripe webhook deliveries.
//!
//! Verifies the delivery, moves the tracked payment to its terminal status,
//! then relays the outcome to the caller's callback URL. A failed callback
//! surfaces as a retryable error so Stripe redelivers the event.

use std::sync::Arc;

use crate::domain::foundation::{PaymentId, Timestamp};
use crate::domain::payment::{CallbackPayload, PaymentStatus, WebhookError};
use crate::ports::{CallbackNotifier, PaymentProvider, PaymentRepository, WebhookEventType};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header.
    pub signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackDelivery {
    Delivered,
    /// The payment was created without a callback URL.
    NotConfigured,
}

/// Result of webhook processing. Every variant is acknowledged to Stripe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// The payment reached (or was already in) a terminal status.
    PaymentUpdated {
        payment_id: PaymentId,
        status: PaymentStatus,
        callback: CallbackDelivery,
    },
    /// No tracked payment has this intent id.
    UnknownPayment { intent_id: String },
    /// The event asked for a move between two different terminal statuses.
    TransitionRejected {
        payment_id: PaymentId,
        from: PaymentStatus,
        to: PaymentStatus,
    },
    /// Event type the relay does not react to.
    Ignored { event_type: String },
}

pub struct HandlePaymentWebhookHandler {
    provider: Arc<dyn PaymentProvider>,
    repository: Arc<dyn PaymentRepository>,
    notifier: Arc<dyn CallbackNotifier>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        repository: Arc<dyn PaymentRepository>,
        notifier: Arc<dyn CallbackNotifier>,
    ) -> Self {
        Self {
            provider,
            repository,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Verify webhook signature and parse event
        let event = self
            .provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await?;

        let target = match &event.event_type {
            WebhookEventType::PaymentSucceeded => PaymentStatus::Success,
            WebhookEventType::PaymentFailed => PaymentStatus::Failed,
            WebhookEventType::PaymentCanceled => PaymentStatus::Canceled,
            WebhookEventType::Unknown(event_type) => {
                tracing::debug!(event_id = %event.id, event_type = %event_type, "Ignoring webhook event");
                return Ok(HandlePaymentWebhookResult::Ignored {
                    event_type: event_type.clone(),
                });
            }
        };

        let intent = event
            .payment_intent
            .ok_or_else(|| WebhookError::ParseError("Event carries no payment intent".to_string()))?;

        // 2. Find the tracked payment
        let payment_id = PaymentId::new(intent.intent_id.clone())
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;
        let Some(mut request) = self
            .repository
            .find(&payment_id)
            .await
            .map_err(|e| WebhookError::Processing(e.to_string()))?
        else {
            tracing::warn!(
                event_id = %event.id,
                payment_id = %payment_id,
                "Webhook for untracked payment"
            );
            return Ok(HandlePaymentWebhookResult::UnknownPayment {
                intent_id: intent.intent_id,
            });
        };

        // 3. Apply the status change
        let now = Timestamp::now();
        let from = request.status;
        let applied = match target {
            PaymentStatus::Success => request.mark_succeeded(now),
            PaymentStatus::Failed => request.mark_failed(intent.failure_message, now),
            _ => request.mark_canceled(now),
        };
        if let Err(err) = applied {
            tracing::warn!(payment_id = %payment_id, error = %err, "Rejected payment status change");
            return Ok(HandlePaymentWebhookResult::TransitionRejected {
                payment_id,
                from,
                to: target,
            });
        }

        self.repository
            .save(&request)
            .await
            .map_err(|e| WebhookError::Processing(e.to_string()))?;

        tracing::info!(
            event_id = %event.id,
            payment_id = %payment_id,
            status = %request.status,
            "Payment status updated"
        );

        // 4. Relay the outcome
        let callback = match (&request.callback_url, CallbackPayload::for_request(&request, now)) {
            (Some(url), Some(payload)) => {
                self.notifier
                    .notify(url, &payload)
                    .await
                    .map_err(|e| WebhookError::CallbackFailed(e.to_string()))?;
                CallbackDelivery::Delivered
            }
            _ => CallbackDelivery::NotConfigured,
        };

        Ok(HandlePaymentWebhookResult::PaymentUpdated {
            payment_id,
            status: request.status,
            callback,
        })
    }
}
