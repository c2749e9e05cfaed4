//! Failure taxonomy shared by every lifecycle service.
//!
//! Each context keeps its own `thiserror` enums; [`FailureKind`] is the
//! common classification the HTTP surface maps onto status codes.

use serde::Serialize;
use std::fmt;

/// Classification of a failed lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed or missing input.
    Validation,
    /// Input was well formed but a cross-entity precondition does not hold.
    BadRequest,
    /// A referenced entity does not exist.
    NotFound,
    /// The authorization gate denied the actor.
    Forbidden,
    /// A uniqueness rule or state transition guard was violated.
    Conflict,
    /// Store failure. Details are never surfaced to callers.
    Internal,
}

impl FailureKind {
    /// Returns the canonical label for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can be classified into a [`FailureKind`].
pub trait Classify {
    /// Returns the failure classification.
    fn kind(&self) -> FailureKind;
}
