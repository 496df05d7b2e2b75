//! CreatePaymentIntentHandler - Command handler for PromptPay intent creation.

use std::sync::Arc;

use crate::domain::foundation::{PaymentId, Timestamp};
use crate::domain::payment::{
    validate_callback_url, validate_caller_identity, Money, PaymentRelayError, PaymentRequest,
    PaymentStatus,
};
use crate::ports::{CreatePaymentIntentRequest, PaymentError, PaymentProvider, PaymentRepository};

/// Provider-facing settings applied to every intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentSettings {
    pub currency: String,
    pub payment_method_types: Vec<String>,
}

impl Default for PaymentIntentSettings {
    fn default() -> Self {
        Self {
            currency: "thb".to_string(),
            payment_method_types: vec!["promptpay".to_string()],
        }
    }
}

/// Command to create a payment intent for a game-side caller.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentCommand {
    pub username: String,
    /// Amount in major units (baht).
    pub amount: f64,
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentIntentResult {
    pub payment_id: PaymentId,
    pub amount: Money,
    pub status: PaymentStatus,
    pub client_secret: Option<String>,
}

pub struct CreatePaymentIntentHandler {
    provider: Arc<dyn PaymentProvider>,
    repository: Arc<dyn PaymentRepository>,
    settings: PaymentIntentSettings,
}

impl CreatePaymentIntentHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        repository: Arc<dyn PaymentRepository>,
        settings: PaymentIntentSettings,
    ) -> Self {
        Self {
            provider,
            repository,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, PaymentRelayError> {
        // 1. Validate input
        let username = cmd.username.trim().to_string();
        validate_caller_identity(&username)?;
        let amount = Money::from_major(cmd.amount)?;
        let callback_url = match cmd.callback_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                validate_callback_url(url)?;
                Some(url.to_string())
            }
            _ => None,
        };

        // 2. Ask the provider for an intent
        let intent = self
            .provider
            .create_payment_intent(CreatePaymentIntentRequest {
                amount_minor: amount.minor_units(),
                currency: self.settings.currency.clone(),
                payment_method_types: self.settings.payment_method_types.clone(),
                username: username.clone(),
                callback_url: callback_url.clone(),
                idempotency_key: Some(uuid::Uuid::new_v4().to_string()),
            })
            .await?;

        let payment_id = PaymentId::new(intent.id)
            .map_err(|_| PaymentError::provider("Provider returned an empty intent id"))?;

        // 3. Track it
        let request = PaymentRequest::new(
            payment_id.clone(),
            username,
            amount,
            callback_url,
            Timestamp::now(),
        );
        self.repository.save(&request).await?;

        tracing::info!(
            payment_id = %payment_id,
            username = %request.caller_identity,
            amount = %amount,
            "Payment intent created"
        );

        Ok(CreatePaymentIntentResult {
            payment_id,
            amount,
            status: request.status,
            client_secret: intent.client_secret,
        })
    }
}
