//! HTTP handlers for the payment relay endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::application::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, DeletePaymentCommand,
    DeletePaymentHandler, GetPaymentStatusHandler, GetPaymentStatusQuery,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    PaymentIntentSettings,
};
use crate::domain::payment::{PaymentRelayError, WebhookError};
use crate::ports::{CallbackNotifier, PaymentProvider, PaymentRepository};

use super::super::error::{ApiError, ApiJson};
use super::dto::{
    CreatePromptPayRequest, CreatePromptPayResponse, DeletePaymentResponse,
    PaymentStatusResponse, WebhookAck,
};

const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Shared state for the payment routes.
#[derive(Clone)]
pub struct PaymentAppState {
    pub provider: Arc<dyn PaymentProvider>,
    pub repository: Arc<dyn PaymentRepository>,
    pub notifier: Arc<dyn CallbackNotifier>,
    pub settings: PaymentIntentSettings,
    pub expose_error_details: bool,
}

impl PaymentAppState {
    pub fn create_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(
            self.provider.clone(),
            self.repository.clone(),
            self.settings.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.provider.clone(),
            self.repository.clone(),
            self.notifier.clone(),
        )
    }

    pub fn status_handler(&self) -> GetPaymentStatusHandler {
        GetPaymentStatusHandler::new(self.repository.clone())
    }

    pub fn delete_handler(&self) -> DeletePaymentHandler {
        DeletePaymentHandler::new(self.repository.clone())
    }

    fn reject(&self, err: PaymentRelayError) -> ApiError {
        ApiError::from(err).exposing_details(self.expose_error_details)
    }
}

/// POST /create-promptpay - Create a PromptPay payment intent
pub async fn create_promptpay(
    State(state): State<PaymentAppState>,
    ApiJson(request): ApiJson<CreatePromptPayRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreatePaymentIntentCommand {
        username: request.username,
        amount: request.amount,
        callback_url: request.callback_url,
    };

    let result = state
        .create_intent_handler()
        .handle(cmd)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(CreatePromptPayResponse::from(result)))
}

/// POST /webhook - Receive a Stripe event
///
/// Anything that is not a verification failure or a retryable processing
/// failure is acknowledged with 200.
pub async fn handle_webhook(
    State(state): State<PaymentAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingSignature)?;

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    match state.webhook_handler().handle(cmd).await {
        Ok(result) => {
            if let HandlePaymentWebhookResult::TransitionRejected { payment_id, from, to } = &result {
                tracing::warn!(%payment_id, %from, %to, "Acknowledging webhook with rejected transition");
            }
        }
        Err(WebhookError::Ignored(reason)) => {
            tracing::debug!(%reason, "Webhook ignored");
        }
        Err(err) => {
            if err.is_retryable() {
                tracing::error!(error = %err, "Webhook processing failed, provider will retry");
            } else {
                tracing::warn!(error = %err, "Webhook rejected");
            }
            return Err(err.into());
        }
    }

    Ok(Json(WebhookAck { received: true }))
}

/// GET /payment-status/:payment_id - Current status of a tracked payment
pub async fn get_payment_status(
    State(state): State<PaymentAppState>,
    Path(payment_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .status_handler()
        .handle(GetPaymentStatusQuery { payment_id })
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(PaymentStatusResponse::from(request)))
}

/// DELETE /payment/:payment_id - Stop tracking a payment
pub async fn delete_payment(
    State(state): State<PaymentAppState>,
    Path(payment_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_handler()
        .handle(DeletePaymentCommand { payment_id })
        .await
        .map_err(|e| state.reject(e))?;

    Ok((
        StatusCode::OK,
        Json(DeletePaymentResponse {
            success: true,
            message: "Payment deleted".to_string(),
        }),
    ))
}
