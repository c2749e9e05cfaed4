//! Failure responses for the HTTP surface.

use crate::bid::services::BidLedgerError;
use crate::error::{Classify, FailureKind};
use crate::identity::services::IdentityServiceError;
use crate::payment::services::PaymentLedgerError;
use crate::review::services::ReviewAggregatorError;
use crate::task::services::TaskRegistryError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;
use tracing::error;

/// Error returned by every handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The bearer credential is missing or unknown.
    #[error("authentication required")]
    Unauthenticated,

    /// A lifecycle operation or request decoding failed.
    #[error("{message}")]
    Failed {
        /// Classification driving the status code.
        kind: FailureKind,
        /// Message returned to the caller.
        message: String,
    },
}

impl ApiError {
    /// Builds a validation failure with the given message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Failed {
            kind: FailureKind::Validation,
            message: message.into(),
        }
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Failed { kind, .. } => match kind {
                FailureKind::Validation | FailureKind::BadRequest => StatusCode::BAD_REQUEST,
                FailureKind::NotFound => StatusCode::NOT_FOUND,
                FailureKind::Forbidden => StatusCode::FORBIDDEN,
                FailureKind::Conflict => StatusCode::CONFLICT,
                FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn classified(err: &(impl Classify + Display)) -> Self {
        let kind = err.kind();
        if kind == FailureKind::Internal {
            error!(error = %err, "request failed");
            return Self::Failed {
                kind,
                message: "internal server error".to_owned(),
            };
        }
        Self::Failed {
            kind,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

macro_rules! from_classified {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self::classified(&err)
                }
            }
        )+
    };
}

from_classified!(
    IdentityServiceError,
    TaskRegistryError,
    BidLedgerError,
    PaymentLedgerError,
    ReviewAggregatorError,
);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}
