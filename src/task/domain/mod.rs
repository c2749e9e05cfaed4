//! Domain model for task postings.
//!
//! Keeps the status machine and the "open iff unassigned" invariant inside
//! the aggregate; persistence and authorization stay outside.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use task::{PersistedTaskData, Task, TaskDetails, TaskFilter, TaskStatus};
