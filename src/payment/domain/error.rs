//! Error types for payment validation and parsing.

use crate::amount::InvalidAmount;
use crate::task::domain::TaskId;
use thiserror::Error;

/// Errors returned while recording or settling payments.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentDomainError {
    /// The amount is not positive.
    #[error("invalid payment amount: {0}")]
    InvalidAmount(#[source] InvalidAmount),

    /// The payment method is empty after trimming.
    #[error("payment method must not be empty")]
    EmptyMethod,

    /// The task has no assigned freelancer to pay.
    #[error("task {0} has no assigned freelancer")]
    Unassigned(TaskId),

    /// The requested status is not one of the recognised values.
    #[error(transparent)]
    UnknownStatus(#[from] ParsePaymentStatusError),
}

/// Error returned while parsing payment statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown payment status: {0}")]
pub struct ParsePaymentStatusError(pub String);
