//! `PostgreSQL` adapters for the task registry.

mod models;
mod repository;
mod schema;

pub use repository::PostgresTaskRepository;
pub(crate) use repository::{load_task, transition_guarded};
