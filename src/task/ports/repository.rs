//! Repository port for task persistence and lookup.

use crate::task::domain::{Task, TaskFilter, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a newly posted task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier is
    /// already taken.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists a changed task, provided its stored status still equals
    /// `expected`.
    ///
    /// The status guard makes every write conditional on the state the
    /// caller read, so a concurrent bid acceptance is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::StatusChanged`] when the stored status
    /// differs from `expected`.
    async fn update(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<()>;

    /// Persists a status transition of `task`, provided its stored status
    /// still equals `expected`.
    ///
    /// Only the status, the assignee, and the update timestamp are written,
    /// so details revised since `task` was read are kept. Returns the task
    /// as stored after the write.
    ///
    /// # Errors
    ///
    /// Same as [`TaskRepository::update`].
    async fn update_status(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<Task>;

    /// Removes a task. Bids and payments referencing it are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching the filter, oldest first.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored status no longer matches the status the caller read.
    #[error("task {task_id} changed concurrently: expected {expected}, found {actual}")]
    StatusChanged {
        /// Task being written.
        task_id: TaskId,
        /// Status the caller expected.
        expected: TaskStatus,
        /// Status found in storage.
        actual: TaskStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
