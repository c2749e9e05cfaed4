//! Repository port for bid persistence and the acceptance commit.

use crate::bid::domain::{Bid, BidId, BidStatus};
use crate::identity::domain::UserId;
use crate::task::{
    domain::{Task, TaskId},
    ports::TaskRepositoryError,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for bid repository operations.
pub type BidRepositoryResult<T> = Result<T, BidRepositoryError>;

/// Bid persistence contract.
#[async_trait]
pub trait BidRepository: Send + Sync {
    /// Stores a newly submitted bid.
    ///
    /// # Errors
    ///
    /// Returns [`BidRepositoryError::AlreadyBid`] when the freelancer already
    /// holds a bid on the task, whatever its status, or
    /// [`BidRepositoryError::DuplicateBid`] when the identifier is taken.
    async fn store(&self, bid: &Bid) -> BidRepositoryResult<()>;

    /// Persists revised terms for an existing bid. The stored status is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BidRepositoryError::NotFound`] when the bid does not exist.
    async fn update(&self, bid: &Bid) -> BidRepositoryResult<()>;

    /// Finds a bid by identifier.
    async fn find_by_id(&self, id: BidId) -> BidRepositoryResult<Option<Bid>>;

    /// Lists the bids placed on a task, oldest first.
    async fn list_for_task(&self, task_id: TaskId) -> BidRepositoryResult<Vec<Bid>>;

    /// Atomically persists an accepted bid together with its assigned task.
    ///
    /// Both writes happen only if the stored task is still `open` and the
    /// stored bid still `pending`; otherwise neither is applied. Only the
    /// task's status, assignee, and update timestamp and the bid's status
    /// and update timestamp are written, so a concurrent edit of the task
    /// details or the bid terms survives. Returns the bid and the task as
    /// stored after the commit.
    ///
    /// # Errors
    ///
    /// Returns [`BidRepositoryError::Task`] wrapping
    /// [`TaskRepositoryError::StatusChanged`] when the task left `open`
    /// concurrently, or [`BidRepositoryError::StatusChanged`] when the bid
    /// left `pending`.
    async fn commit_acceptance(&self, bid: &Bid, task: &Task) -> BidRepositoryResult<(Bid, Task)>;
}

/// Errors returned by bid repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BidRepositoryError {
    /// A bid with the same identifier already exists.
    #[error("duplicate bid identifier: {0}")]
    DuplicateBid(BidId),

    /// The freelancer already bid on the task.
    #[error("freelancer {freelancer_id} already bid on task {task_id}")]
    AlreadyBid {
        /// Task bid on.
        task_id: TaskId,
        /// Freelancer holding the existing bid.
        freelancer_id: UserId,
    },

    /// The bid was not found.
    #[error("bid not found: {0}")]
    NotFound(BidId),

    /// The stored bid is no longer pending.
    #[error("bid {bid_id} changed concurrently: now {actual}")]
    StatusChanged {
        /// Bid being accepted.
        bid_id: BidId,
        /// Status found in storage.
        actual: BidStatus,
    },

    /// The task side of an acceptance commit failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BidRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
