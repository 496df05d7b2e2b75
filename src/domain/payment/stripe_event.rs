//! Stripe webhook event types.
//!
//! Only the fields the payment relay reads are captured. Everything else in
//! Stripe's event schema is ignored on parse.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Event id (`evt_...`).
    pub id: String,

    /// Event type, e.g. `payment_intent.succeeded`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp of event creation.
    pub created: i64,

    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,

    #[serde(default)]
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object the event is about. Shape depends on the event type.
    pub object: serde_json::Value,
}

impl StripeEvent {
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }

    /// Deserializes `data.object` as `T`.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }
}

/// Event types the relay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    PaymentIntentSucceeded,
    PaymentIntentPaymentFailed,
    PaymentIntentCanceled,
    Unknown,
}

impl StripeEventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentIntentPaymentFailed,
            "payment_intent.canceled" => Self::PaymentIntentCanceled,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentPaymentFailed => "payment_intent.payment_failed",
            Self::PaymentIntentCanceled => "payment_intent.canceled",
            Self::Unknown => "unknown",
        }
    }
}

/// The `data.object` of a `payment_intent.*` event.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentIntent {
    pub id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub last_payment_error: Option<StripePaymentError>,
}

impl StripePaymentIntent {
    /// Message from the last payment error, if Stripe sent one.
    pub fn failure_message(&self) -> Option<String> {
        self.last_payment_error
            .as_ref()
            .and_then(|err| err.message.clone())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Builder for test events.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "payment_intent.succeeded".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({ "id": "pi_test_123", "amount": 10000 }),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
            },
            livemode: self.livemode,
            api_version: Some("2023-10-16".to_string()),
        }
    }

    /// Serialized JSON, ready to sign.
    pub fn to_json(self) -> String {
        serde_json::to_string(&self.build()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_event_types() {
        assert_eq!(
            StripeEventType::parse("payment_intent.succeeded"),
            StripeEventType::PaymentIntentSucceeded
        );
        assert_eq!(
            StripeEventType::parse("payment_intent.payment_failed"),
            StripeEventType::PaymentIntentPaymentFailed
        );
        assert_eq!(
            StripeEventType::parse("payment_intent.canceled"),
            StripeEventType::PaymentIntentCanceled
        );
        assert_eq!(
            StripeEventType::parse("charge.refunded"),
            StripeEventType::Unknown
        );
    }

    #[test]
    fn event_type_round_trips_as_str() {
        for ty in [
            StripeEventType::PaymentIntentSucceeded,
            StripeEventType::PaymentIntentPaymentFailed,
            StripeEventType::PaymentIntentCanceled,
        ] {
            assert_eq!(StripeEventType::parse(ty.as_str()), ty);
        }
    }

    #[test]
    fn deserializes_real_shaped_payload() {
        let json = r#"{
            "id": "evt_1",
            "object": "event",
            "type": "payment_intent.payment_failed",
            "created": 1704067200,
            "livemode": false,
            "api_version": null,
            "data": { "object": {
                "id": "pi_1",
                "object": "payment_intent",
                "amount": 5000,
                "currency": "thb",
                "status": "requires_payment_method",
                "metadata": { "username": "Alice" },
                "last_payment_error": { "code": "expired", "message": "QR code expired" }
            }}
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();
        let intent: StripePaymentIntent = event.deserialize_object().unwrap();

        assert_eq!(event.parsed_type(), StripeEventType::PaymentIntentPaymentFailed);
        assert_eq!(intent.id, "pi_1");
        assert_eq!(intent.metadata.get("username").map(String::as_str), Some("Alice"));
        assert_eq!(intent.failure_message().as_deref(), Some("QR code expired"));
    }

    #[test]
    fn missing_error_yields_no_failure_message() {
        let event = StripeEventBuilder::new().build();
        let intent: StripePaymentIntent = event.deserialize_object().unwrap();
        assert!(intent.failure_message().is_none());
    }
}
