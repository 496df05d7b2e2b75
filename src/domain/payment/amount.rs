//! Payment amounts.

use std::fmt;

use crate::domain::foundation::ValidationError;

/// Largest amount the provider accepts, in minor units.
pub const MAX_MINOR_UNITS: u64 = 99_999_999;

/// A positive amount held in minor currency units (satang for THB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    minor_units: u64,
}

impl Money {
    /// Converts a major-unit amount (e.g. baht) with at most two decimals.
    pub fn from_major(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::invalid_format(
                "amount",
                "must be a positive number",
            ));
        }

        let scaled = amount * 100.0;
        let minor = scaled.round();
        if (scaled - minor).abs() > 1e-6 {
            return Err(ValidationError::invalid_format(
                "amount",
                "must have at most two decimal places",
            ));
        }
        if minor > MAX_MINOR_UNITS as f64 {
            return Err(ValidationError::invalid_format("amount", "exceeds maximum"));
        }

        Ok(Self {
            minor_units: minor as u64,
        })
    }

    pub fn from_minor(minor_units: u64) -> Self {
        Self { minor_units }
    }

    pub fn minor_units(&self) -> u64 {
        self.minor_units
    }

    pub fn as_major(&self) -> f64 {
        self.minor_units as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.minor_units / 100, self.minor_units % 100)
    }
}
