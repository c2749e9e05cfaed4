//! Service layer for placing, revising, and accepting bids.

use crate::access::{AccessDenied, Actor, authorize};
use crate::bid::{
    domain::{Bid, BidDomainError, BidId, BidTerms},
    ports::{BidRepository, BidRepositoryError},
};
use crate::error::{Classify, FailureKind};
use crate::identity::domain::Role;
use crate::task::{
    domain::{Task, TaskDomainError, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
    services::classify_repository as classify_task_repository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Unvalidated bid fields as supplied by a freelancer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BidTermsRequest {
    /// Offered amount; must be greater than zero.
    #[serde(default)]
    pub amount: f64,
    /// Proposed delivery deadline; required.
    #[serde(default)]
    pub proposed_deadline: Option<DateTime<Utc>>,
    /// Cover letter; must not be blank.
    #[serde(default)]
    pub cover_letter: String,
}

impl BidTermsRequest {
    /// Creates a request with every field set.
    #[must_use]
    pub fn new(amount: f64, proposed_deadline: DateTime<Utc>, cover_letter: impl Into<String>) -> Self {
        Self {
            amount,
            proposed_deadline: Some(proposed_deadline),
            cover_letter: cover_letter.into(),
        }
    }

    fn into_terms(self) -> Result<BidTerms, BidDomainError> {
        BidTerms::new(self.amount, self.proposed_deadline, self.cover_letter)
    }
}

/// Outcome of a successful acceptance: the accepted bid and the task it
/// assigned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidAcceptance {
    /// Accepted bid.
    pub bid: Bid,
    /// Task now in progress with the bidder assigned.
    pub task: Task,
}

/// Service-level errors for bid ledger operations.
#[derive(Debug, Error)]
pub enum BidLedgerError {
    /// Bid validation or status transition failed.
    #[error(transparent)]
    Domain(#[from] BidDomainError),
    /// The task could not be assigned.
    #[error(transparent)]
    Task(#[from] TaskDomainError),
    /// Bid repository operation failed.
    #[error(transparent)]
    Repository(#[from] BidRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// The authorization gate denied the actor.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    /// No bid exists with the given identifier.
    #[error("bid {0} not found")]
    BidNotFound(BidId),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
}

impl Classify for BidLedgerError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(err) if err.is_transition_violation() => FailureKind::Conflict,
            Self::Domain(_) => FailureKind::Validation,
            Self::Task(err) if err.is_transition_violation() => FailureKind::Conflict,
            Self::Task(_) => FailureKind::Internal,
            Self::Repository(err) => match err {
                BidRepositoryError::NotFound(_) => FailureKind::NotFound,
                BidRepositoryError::DuplicateBid(_)
                | BidRepositoryError::AlreadyBid { .. }
                | BidRepositoryError::StatusChanged { .. } => FailureKind::Conflict,
                BidRepositoryError::Task(task_err) => classify_task_repository(task_err),
                BidRepositoryError::Persistence(_) => FailureKind::Internal,
            },
            Self::TaskRepository(err) => classify_task_repository(err),
            Self::AccessDenied(err) => err.kind(),
            Self::BidNotFound(_) | Self::TaskNotFound(_) => FailureKind::NotFound,
        }
    }
}

/// Result type for bid ledger service operations.
pub type BidLedgerResult<T> = Result<T, BidLedgerError>;

/// Bid ledger orchestration service.
#[derive(Clone)]
pub struct BidLedgerService<B, T, C>
where
    B: BidRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    bids: Arc<B>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<B, T, C> BidLedgerService<B, T, C>
where
    B: BidRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new bid ledger service.
    #[must_use]
    pub const fn new(bids: Arc<B>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self { bids, tasks, clock }
    }

    /// Places a pending bid by the acting freelancer on an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`BidLedgerError::AccessDenied`] unless the actor is a
    /// freelancer, [`BidLedgerError::TaskNotFound`] for an unknown task,
    /// [`BidLedgerError::Domain`] for invalid terms, or
    /// [`BidLedgerError::Repository`] when the freelancer already bid on the
    /// task.
    pub async fn create_bid(
        &self,
        actor: &Actor,
        task_id: TaskId,
        request: BidTermsRequest,
    ) -> BidLedgerResult<Bid> {
        authorize(actor, Some(Role::Freelancer), None)?;
        self.load_task(task_id).await?;
        let terms = request.into_terms()?;
        let bid = Bid::submit(task_id, actor.id(), terms, &*self.clock);
        self.bids.store(&bid).await?;
        info!(bid_id = %bid.id(), %task_id, freelancer_id = %actor.id(), "bid placed");
        Ok(bid)
    }

    /// Revises the terms of a bid owned by the actor.
    ///
    /// Accepted and rejected bids can still be revised.
    ///
    /// # Errors
    ///
    /// Returns [`BidLedgerError::BidNotFound`] for an unknown bid,
    /// [`BidLedgerError::AccessDenied`] when the actor did not place it,
    /// [`BidLedgerError::Domain`] for invalid terms, or
    /// [`BidLedgerError::Repository`] when persistence fails.
    pub async fn update_bid(
        &self,
        actor: &Actor,
        bid_id: BidId,
        request: BidTermsRequest,
    ) -> BidLedgerResult<Bid> {
        let mut bid = self.load_bid(bid_id).await?;
        authorize(actor, None, Some(bid.freelancer_id()))?;
        let terms = request.into_terms()?;
        bid.revise(terms, &*self.clock);
        self.bids.update(&bid).await?;
        Ok(bid)
    }

    /// Accepts a bid on behalf of the owning client and assigns its task.
    ///
    /// The bid and the task are committed together; if the task is no
    /// longer open or the bid no longer pending, nothing is written.
    /// Sibling bids stay pending.
    ///
    /// # Errors
    ///
    /// Returns [`BidLedgerError::BidNotFound`] or
    /// [`BidLedgerError::TaskNotFound`] for unknown entities,
    /// [`BidLedgerError::AccessDenied`] when the actor does not own the task,
    /// a conflict-classified error when the bid or task already moved on,
    /// or [`BidLedgerError::Repository`] when persistence fails.
    pub async fn accept_bid(&self, actor: &Actor, bid_id: BidId) -> BidLedgerResult<BidAcceptance> {
        let mut bid = self.load_bid(bid_id).await?;
        let mut task = self.load_task(bid.task_id()).await?;
        authorize(actor, None, Some(task.client_id()))?;

        bid.accept(&*self.clock)?;
        task.assign_and_start(bid.freelancer_id(), &*self.clock)?;

        let (bid, task) = match self.bids.commit_acceptance(&bid, &task).await {
            Ok(committed) => committed,
            Err(err) => {
                if matches!(
                    err,
                    BidRepositoryError::StatusChanged { .. }
                        | BidRepositoryError::Task(TaskRepositoryError::StatusChanged { .. })
                ) {
                    warn!(%bid_id, task_id = %task.id(), error = %err, "bid acceptance lost a race");
                }
                return Err(err.into());
            }
        };

        info!(%bid_id, task_id = %task.id(), freelancer_id = %bid.freelancer_id(), "bid accepted");
        debug!(task_id = %task.id(), "sibling bids left pending");
        Ok(BidAcceptance { bid, task })
    }

    /// Lists the bids placed on a task.
    ///
    /// # Errors
    ///
    /// Returns [`BidLedgerError::TaskNotFound`] for an unknown task or
    /// [`BidLedgerError::Repository`] when lookup fails.
    pub async fn list_bids_for_task(&self, task_id: TaskId) -> BidLedgerResult<Vec<Bid>> {
        self.load_task(task_id).await?;
        Ok(self.bids.list_for_task(task_id).await?)
    }

    async fn load_bid(&self, bid_id: BidId) -> BidLedgerResult<Bid> {
        self.bids
            .find_by_id(bid_id)
            .await?
            .ok_or(BidLedgerError::BidNotFound(bid_id))
    }

    async fn load_task(&self, task_id: TaskId) -> BidLedgerResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(BidLedgerError::TaskNotFound(task_id))
    }
}
