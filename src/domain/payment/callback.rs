//! Outcome payload delivered to a payment's callback URL.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

use super::{PaymentRequest, PaymentStatus};

const CANCELED_REASON: &str = "Payment was canceled by user or timeout";

/// JSON body POSTed to the caller's callback URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallbackPayload {
    pub success: bool,
    pub username: String,
    pub payment_id: String,
    pub amount: f64,
    /// `completed`, `failed` or `canceled`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// ISO-8601 time the payload was built.
    pub timestamp: String,
}

impl CallbackPayload {
    /// Builds the payload for a payment that reached a terminal status.
    ///
    /// Returns `None` while the payment is still pending.
    pub fn for_request(request: &PaymentRequest, at: Timestamp) -> Option<Self> {
        let reason = match request.status {
            PaymentStatus::Pending => return None,
            PaymentStatus::Success => None,
            PaymentStatus::Failed => request.failure_reason.clone(),
            PaymentStatus::Canceled => Some(CANCELED_REASON.to_string()),
        };

        Some(Self {
            success: request.status == PaymentStatus::Success,
            username: request.caller_identity.clone(),
            payment_id: request.id.to_string(),
            amount: request.amount.as_major(),
            status: request.status.callback_label(),
            reason,
            timestamp: at.to_iso8601(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PaymentId;
    use crate::domain::payment::Money;

    fn request() -> PaymentRequest {
        PaymentRequest::new(
            PaymentId::new("pi_1").unwrap(),
            "Alice",
            Money::from_major(50.0).unwrap(),
            Some("https://cb.example".to_string()),
            Timestamp::now(),
        )
    }

    #[test]
    fn pending_has_no_payload() {
        assert!(CallbackPayload::for_request(&request(), Timestamp::now()).is_none());
    }

    #[test]
    fn success_payload_shape() {
        let mut req = request();
        req.mark_succeeded(Timestamp::now()).unwrap();

        let payload = CallbackPayload::for_request(&req, Timestamp::now()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["username"], "Alice");
        assert_eq!(json["payment_id"], "pi_1");
        assert_eq!(json["amount"], 50.0);
        assert_eq!(json["status"], "completed");
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn failed_payload_carries_reason() {
        let mut req = request();
        req.mark_failed(Some("declined".to_string()), Timestamp::now())
            .unwrap();

        let payload = CallbackPayload::for_request(&req, Timestamp::now()).unwrap();

        assert!(!payload.success);
        assert_eq!(payload.status, "failed");
        assert_eq!(payload.reason.as_deref(), Some("declined"));
    }

    #[test]
    fn canceled_payload_has_fixed_reason() {
        let mut req = request();
        req.mark_canceled(Timestamp::now()).unwrap();

        let payload = CallbackPayload::for_request(&req, Timestamp::now()).unwrap();

        assert_eq!(payload.status, "canceled");
        assert_eq!(payload.reason.as_deref(), Some(CANCELED_REASON));
    }
}
