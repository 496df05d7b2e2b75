//! Tracked payment requests.

use thiserror::Error;

use crate::domain::foundation::{PaymentId, Timestamp, ValidationError};

use super::{Money, PaymentStatus};

/// Default failure reason when the provider gives none.
pub const DEFAULT_FAILURE_REASON: &str = "Payment failed";

/// A status change that the state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot move payment from {from} to {to}")]
pub struct TransitionError {
    pub from: PaymentStatus,
    pub to: PaymentStatus,
}

/// Result of applying an allowed status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The status changed.
    Applied,
    /// The payment was already in the target status.
    Unchanged,
}

/// One payment intent created on behalf of a game-side caller.
///
/// Lives in memory only. Mutated by webhook handling.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub id: PaymentId,
    /// Game identity that asked for the payment.
    pub caller_identity: String,
    pub amount: Money,
    pub callback_url: Option<String>,
    pub status: PaymentStatus,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub failed_at: Option<Timestamp>,
    pub canceled_at: Option<Timestamp>,
    pub failure_reason: Option<String>,
}

impl PaymentRequest {
    pub fn new(
        id: PaymentId,
        caller_identity: impl Into<String>,
        amount: Money,
        callback_url: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            caller_identity: caller_identity.into(),
            amount,
            callback_url,
            status: PaymentStatus::Pending,
            created_at,
            completed_at: None,
            failed_at: None,
            canceled_at: None,
            failure_reason: None,
        }
    }

    pub fn mark_succeeded(&mut self, at: Timestamp) -> Result<Transition, TransitionError> {
        let transition = self.transition(PaymentStatus::Success)?;
        if transition == Transition::Applied {
            self.completed_at = Some(at);
        }
        Ok(transition)
    }

    /// Records a failure. `reason` falls back to [`DEFAULT_FAILURE_REASON`].
    pub fn mark_failed(
        &mut self,
        reason: Option<String>,
        at: Timestamp,
    ) -> Result<Transition, TransitionError> {
        let transition = self.transition(PaymentStatus::Failed)?;
        if transition == Transition::Applied {
            self.failed_at = Some(at);
            self.failure_reason =
                Some(reason.unwrap_or_else(|| DEFAULT_FAILURE_REASON.to_string()));
        }
        Ok(transition)
    }

    pub fn mark_canceled(&mut self, at: Timestamp) -> Result<Transition, TransitionError> {
        let transition = self.transition(PaymentStatus::Canceled)?;
        if transition == Transition::Applied {
            self.canceled_at = Some(at);
        }
        Ok(transition)
    }

    fn transition(&mut self, to: PaymentStatus) -> Result<Transition, TransitionError> {
        if !self.status.can_transition_to(&to) {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }
        if self.status == to {
            return Ok(Transition::Unchanged);
        }
        self.status = to;
        Ok(Transition::Applied)
    }
}

/// Validates a caller identity for a payment request.
pub fn validate_caller_identity(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field("username"));
    }
    let chars = value.chars().count();
    if chars > 100 {
        return Err(ValidationError::too_long("username", 100, chars));
    }
    Ok(())
}

/// Accepts only absolute http(s) callback URLs.
pub fn validate_callback_url(url: &str) -> Result<(), ValidationError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ValidationError::invalid_format(
            "callback_url",
            "must be an absolute http(s) URL",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest::new(
            PaymentId::new("pi_123").unwrap(),
            "Alice",
            Money::from_major(100.0).unwrap(),
            Some("https://game.example/cb".to_string()),
            Timestamp::now(),
        )
    }

    #[test]
    fn new_request_is_pending() {
        let req = request();
        assert_eq!(req.status, PaymentStatus::Pending);
        assert!(req.completed_at.is_none());
    }

    #[test]
    fn success_records_completion_time() {
        let mut req = request();
        let at = Timestamp::now();

        assert_eq!(req.mark_succeeded(at).unwrap(), Transition::Applied);
        assert_eq!(req.status, PaymentStatus::Success);
        assert_eq!(req.completed_at, Some(at));
    }

    #[test]
    fn repeated_success_is_unchanged() {
        let mut req = request();
        let first = Timestamp::now();
        req.mark_succeeded(first).unwrap();

        let again = req.mark_succeeded(first.plus_secs(10)).unwrap();

        assert_eq!(again, Transition::Unchanged);
        assert_eq!(req.completed_at, Some(first));
    }

    #[test]
    fn failure_uses_default_reason() {
        let mut req = request();
        req.mark_failed(None, Timestamp::now()).unwrap();
        assert_eq!(req.failure_reason.as_deref(), Some(DEFAULT_FAILURE_REASON));
        assert!(req.failed_at.is_some());
    }

    #[test]
    fn failure_keeps_provider_reason() {
        let mut req = request();
        req.mark_failed(Some("QR code expired".to_string()), Timestamp::now())
            .unwrap();
        assert_eq!(req.failure_reason.as_deref(), Some("QR code expired"));
    }

    #[test]
    fn cross_terminal_transition_rejected() {
        let mut req = request();
        req.mark_succeeded(Timestamp::now()).unwrap();

        let err = req.mark_canceled(Timestamp::now()).unwrap_err();

        assert_eq!(err.from, PaymentStatus::Success);
        assert_eq!(err.to, PaymentStatus::Canceled);
        assert_eq!(req.status, PaymentStatus::Success);
        assert!(req.canceled_at.is_none());
    }

    #[test]
    fn callback_url_validation() {
        assert!(validate_callback_url("https://game.example/cb").is_ok());
        assert!(validate_callback_url("http://localhost:8080/cb").is_ok());
        assert!(validate_callback_url("ftp://x").is_err());
        assert!(validate_callback_url("https://").is_err());
        assert!(validate_callback_url("not a url").is_err());
    }

    #[test]
    fn caller_identity_validation() {
        assert!(validate_caller_identity("Alice").is_ok());
        assert!(validate_caller_identity(" ").is_err());
        assert!(validate_caller_identity(&"a".repeat(101)).is_err());
    }
}
