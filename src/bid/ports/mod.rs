//! Port contracts for the bid ledger.

pub mod repository;

pub use repository::{BidRepository, BidRepositoryError, BidRepositoryResult};
