//! Error types for task domain validation and parsing.

use super::TaskId;
use crate::amount::InvalidAmount;
use thiserror::Error;

/// Errors returned while constructing or transitioning tasks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The deadline was not supplied.
    #[error("task deadline is required")]
    MissingDeadline,

    /// The budget is not a positive amount.
    #[error("invalid task budget: {0}")]
    InvalidBudget(#[source] InvalidAmount),

    /// The requested status transition is not permitted.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current status.
        from: &'static str,
        /// Requested status.
        to: &'static str,
    },

    /// Persisted data violates the "open iff unassigned" invariant.
    #[error("task {task_id} in status {status} has inconsistent assignment")]
    InconsistentAssignment {
        /// Offending task.
        task_id: TaskId,
        /// Persisted status.
        status: &'static str,
    },
}

impl TaskDomainError {
    /// Returns whether the error is a status-machine violation rather than
    /// malformed input.
    #[must_use]
    pub const fn is_transition_violation(&self) -> bool {
        matches!(self, Self::InvalidStatusTransition { .. })
    }
}

/// Error returned while parsing task statuses from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
