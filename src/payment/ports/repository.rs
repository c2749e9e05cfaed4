//! Repository port for payment persistence and lookup.

use crate::payment::domain::{Payment, PaymentId};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for payment repository operations.
pub type PaymentRepositoryResult<T> = Result<T, PaymentRepositoryError>;

/// Payment persistence contract.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Stores a newly recorded payment.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentRepositoryError::DuplicatePayment`] when the
    /// identifier is already taken.
    async fn store(&self, payment: &Payment) -> PaymentRepositoryResult<()>;

    /// Persists a settled payment's status, transaction reference, and
    /// update timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentRepositoryError::NotFound`] when the payment does not
    /// exist.
    async fn update(&self, payment: &Payment) -> PaymentRepositoryResult<()>;

    /// Finds a payment by identifier.
    async fn find_by_id(&self, id: PaymentId) -> PaymentRepositoryResult<Option<Payment>>;

    /// Lists payments recorded against a task, oldest first.
    async fn list_for_task(&self, task_id: TaskId) -> PaymentRepositoryResult<Vec<Payment>>;
}

/// Errors returned by payment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PaymentRepositoryError {
    /// A payment with the same identifier already exists.
    #[error("duplicate payment identifier: {0}")]
    DuplicatePayment(PaymentId),

    /// The payment was not found.
    #[error("payment not found: {0}")]
    NotFound(PaymentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PaymentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
