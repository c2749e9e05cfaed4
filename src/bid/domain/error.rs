//! Error types for bid validation and parsing.

use super::BidId;
use crate::amount::InvalidAmount;
use thiserror::Error;

/// Errors returned while constructing or transitioning bids.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BidDomainError {
    /// The offered amount is not positive.
    #[error("invalid bid amount: {0}")]
    InvalidAmount(#[source] InvalidAmount),

    /// The proposed deadline was not supplied.
    #[error("proposed deadline is required")]
    MissingDeadline,

    /// The cover letter is empty after trimming.
    #[error("cover letter must not be empty")]
    EmptyCoverLetter,

    /// The bid is no longer pending.
    #[error("bid {bid_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Bid being transitioned.
        bid_id: BidId,
        /// Current status.
        from: &'static str,
        /// Requested status.
        to: &'static str,
    },
}

impl BidDomainError {
    /// Returns whether the error is a status-machine violation.
    #[must_use]
    pub const fn is_transition_violation(&self) -> bool {
        matches!(self, Self::InvalidStatusTransition { .. })
    }
}

/// Error returned while parsing bid statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown bid status: {0}")]
pub struct ParseBidStatusError(pub String);
