//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IdentityDomainError {
    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// A required name field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    /// A rating lies outside the `0..=5` range.
    #[error("rating {0} is outside the 0 to 5 range")]
    RatingOutOfRange(f64),
}

/// Error returned while parsing roles from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
