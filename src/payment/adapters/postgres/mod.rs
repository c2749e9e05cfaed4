//! `PostgreSQL` adapters for the payment ledger.

mod models;
mod repository;
mod schema;

pub use repository::PostgresPaymentRepository;
