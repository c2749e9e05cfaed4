//! Service layer for recording and settling payments.

use crate::access::{AccessDenied, Actor, authorize};
use crate::error::{Classify, FailureKind};
use crate::payment::{
    domain::{Payment, PaymentDomainError, PaymentId, PaymentStatus},
    ports::{PaymentRepository, PaymentRepositoryError},
};
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
    services::classify_repository as classify_task_repository,
};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Fields supplied by a client recording a payment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PaymentRequest {
    /// Amount; must be greater than zero.
    #[serde(default)]
    pub amount: f64,
    /// Payment method, for example `card` or `bank_transfer`.
    #[serde(default)]
    pub payment_method: String,
    /// Optional gateway label. No gateway is contacted.
    #[serde(default)]
    pub payment_gateway: Option<String>,
}

/// Fields supplied when settling a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentSettlementRequest {
    /// One of `pending`, `completed`, `failed`, `refunded`.
    #[serde(default)]
    pub status: String,
    /// Processor reference; a blank value keeps the stored one.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Service-level errors for payment ledger operations.
#[derive(Debug, Error)]
pub enum PaymentLedgerError {
    /// Payment validation failed or the task is unassigned.
    #[error(transparent)]
    Domain(#[from] PaymentDomainError),
    /// Payment repository operation failed.
    #[error(transparent)]
    Repository(#[from] PaymentRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// The authorization gate denied the actor.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    /// No payment exists with the given identifier.
    #[error("payment {0} not found")]
    PaymentNotFound(PaymentId),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
}

impl Classify for PaymentLedgerError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(PaymentDomainError::Unassigned(_)) => FailureKind::BadRequest,
            Self::Domain(_) => FailureKind::Validation,
            Self::Repository(err) => match err {
                PaymentRepositoryError::NotFound(_) => FailureKind::NotFound,
                PaymentRepositoryError::DuplicatePayment(_) => FailureKind::Conflict,
                PaymentRepositoryError::Persistence(_) => FailureKind::Internal,
            },
            Self::TaskRepository(err) => classify_task_repository(err),
            Self::AccessDenied(err) => err.kind(),
            Self::PaymentNotFound(_) | Self::TaskNotFound(_) => FailureKind::NotFound,
        }
    }
}

/// Result type for payment ledger service operations.
pub type PaymentLedgerResult<T> = Result<T, PaymentLedgerError>;

/// Payment ledger orchestration service.
#[derive(Clone)]
pub struct PaymentLedgerService<P, T, C>
where
    P: PaymentRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    payments: Arc<P>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<P, T, C> PaymentLedgerService<P, T, C>
where
    P: PaymentRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new payment ledger service.
    #[must_use]
    pub const fn new(payments: Arc<P>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            payments,
            tasks,
            clock,
        }
    }

    /// Records a pending payment from the task's owner to its assignee.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentLedgerError::TaskNotFound`] for an unknown task,
    /// [`PaymentLedgerError::AccessDenied`] when the actor does not own it,
    /// [`PaymentLedgerError::Domain`] when the task is unassigned or the
    /// fields are invalid, or [`PaymentLedgerError::Repository`] when
    /// persistence fails.
    pub async fn create_payment(
        &self,
        actor: &Actor,
        task_id: TaskId,
        request: PaymentRequest,
    ) -> PaymentLedgerResult<Payment> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(PaymentLedgerError::TaskNotFound(task_id))?;
        authorize(actor, None, Some(task.client_id()))?;

        let payment = Payment::record(
            &task,
            request.amount,
            &request.payment_method,
            request.payment_gateway,
            &*self.clock,
        )?;
        self.payments.store(&payment).await?;
        info!(
            payment_id = %payment.id(),
            %task_id,
            freelancer_id = %payment.freelancer_id(),
            "payment recorded"
        );
        Ok(payment)
    }

    /// Sets a payment's status and transaction reference.
    ///
    /// Any authenticated actor may settle any payment.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentLedgerError::Domain`] for an unrecognised status,
    /// [`PaymentLedgerError::PaymentNotFound`] for an unknown payment, or
    /// [`PaymentLedgerError::Repository`] when persistence fails.
    pub async fn update_payment(
        &self,
        actor: &Actor,
        payment_id: PaymentId,
        request: PaymentSettlementRequest,
    ) -> PaymentLedgerResult<Payment> {
        let status = PaymentStatus::try_from(request.status.as_str())
            .map_err(PaymentDomainError::from)?;
        let mut payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or(PaymentLedgerError::PaymentNotFound(payment_id))?;
        if actor.id() != payment.client_id() {
            debug!(%payment_id, actor_id = %actor.id(), "payment settled by a non-owner");
        }

        payment.settle(status, request.transaction_id, &*self.clock);
        self.payments.update(&payment).await?;
        info!(%payment_id, %status, "payment settled");
        Ok(payment)
    }

    /// Lists the payments recorded against a task.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentLedgerError::Repository`] when lookup fails.
    pub async fn list_payments_for_task(&self, task_id: TaskId) -> PaymentLedgerResult<Vec<Payment>> {
        Ok(self.payments.list_for_task(task_id).await?)
    }
}
