//! `PostgreSQL` adapters for the review aggregator.

mod models;
mod repository;
mod schema;

pub use repository::PostgresReviewRepository;
