//! `PostgreSQL` adapters for the bid ledger.

mod models;
mod repository;
mod schema;

pub use repository::PostgresBidRepository;
