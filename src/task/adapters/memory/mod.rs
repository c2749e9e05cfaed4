//! In-memory task registry adapters.

mod task;

pub use task::InMemoryTaskRepository;
