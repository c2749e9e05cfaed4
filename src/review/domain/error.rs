//! Error types for review validation.

use crate::task::domain::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while writing reviews.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// The score lies outside `1..=5`.
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    /// Only completed tasks can be reviewed.
    #[error("task {task_id} is {status}; only completed tasks can be reviewed")]
    TaskNotCompleted {
        /// Task the review targets.
        task_id: TaskId,
        /// Current task status.
        status: TaskStatus,
    },
}
