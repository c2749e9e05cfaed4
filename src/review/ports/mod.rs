//! Port contracts for the review aggregator.

pub mod repository;

pub use repository::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult};
