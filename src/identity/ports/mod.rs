//! Port contracts for the identity store.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
