//! Positive monetary amount shared by budgets, bids, and payments.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when an amount is zero, negative, or not finite.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("amount must be a finite value greater than zero, got {0}")]
pub struct InvalidAmount(pub f64);

/// Strictly positive, finite monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// Creates a validated amount.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAmount`] when the value is not finite or is not
    /// greater than zero.
    pub fn new(value: f64) -> Result<Self, InvalidAmount> {
        if !value.is_finite() || value <= 0.0 {
            return Err(InvalidAmount(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = InvalidAmount;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
