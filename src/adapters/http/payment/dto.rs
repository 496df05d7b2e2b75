//! Request and response types for the payment relay endpoints.

use serde::{Deserialize, Serialize};

use crate::application::CreatePaymentIntentResult;
use crate::domain::payment::{PaymentRequest, PaymentStatus};

/// Body of `POST /create-promptpay`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePromptPayRequest {
    #[serde(default)]
    pub username: String,
    /// Amount in major units (baht).
    pub amount: f64,
    #[serde(default)]
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePromptPayResponse {
    pub success: bool,
    pub payment_id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    /// Handed to the client to confirm the payment.
    pub client_secret: Option<String>,
}

impl From<CreatePaymentIntentResult> for CreatePromptPayResponse {
    fn from(result: CreatePaymentIntentResult) -> Self {
        Self {
            success: true,
            payment_id: result.payment_id.to_string(),
            amount: result.amount.as_major(),
            status: result.status,
            client_secret: result.client_secret,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub payment_id: String,
    pub username: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub failed_at: Option<String>,
    pub canceled_at: Option<String>,
    pub failure_reason: Option<String>,
}

impl From<PaymentRequest> for PaymentStatusResponse {
    fn from(request: PaymentRequest) -> Self {
        Self {
            payment_id: request.id.to_string(),
            username: request.caller_identity,
            amount: request.amount.as_major(),
            status: request.status,
            created_at: request.created_at.to_iso8601(),
            completed_at: request.completed_at.map(|t| t.to_iso8601()),
            failed_at: request.failed_at.map(|t| t.to_iso8601()),
            canceled_at: request.canceled_at.map(|t| t.to_iso8601()),
            failure_reason: request.failure_reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePaymentResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PaymentId, Timestamp};
    use crate::domain::payment::Money;

    #[test]
    fn status_view_carries_terminal_timestamps() {
        let mut request = PaymentRequest::new(
            PaymentId::new("pi_1").unwrap(),
            "Builder",
            Money::from_minor(12_550),
            None,
            Timestamp::now(),
        );
        request
            .mark_failed(Some("card declined".to_string()), Timestamp::now())
            .unwrap();

        let json = serde_json::to_value(PaymentStatusResponse::from(request)).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["amount"], 125.5);
        assert_eq!(json["failure_reason"], "card declined");
        assert!(json["failed_at"].is_string());
        assert!(json["completed_at"].is_null());
    }

    #[test]
    fn create_request_callback_is_optional() {
        let request: CreatePromptPayRequest =
            serde_json::from_str(r#"{"username":"Builder","amount":50}"#).unwrap();
        assert_eq!(request.amount, 50.0);
        assert!(request.callback_url.is_none());
    }
}
