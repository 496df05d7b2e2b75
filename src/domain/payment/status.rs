//! Payment status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a tracked payment.
///
/// ```text
/// Pending ──► Success
///    │
///    ├──────► Failed
///    │
///    └──────► Canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
    Canceled,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }

    /// Whether moving to `target` is allowed. Re-applying the current
    /// terminal status is allowed and has no effect.
    pub fn can_transition_to(&self, target: &PaymentStatus) -> bool {
        match (self, target) {
            (PaymentStatus::Pending, t) => t.is_terminal(),
            (current, t) => current == t,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Canceled => "canceled",
        }
    }

    /// Status string sent to callback receivers.
    pub fn callback_label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
