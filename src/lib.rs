//! Tasklance: lifecycle engine for a freelance marketplace.
//!
//! Clients post tasks, freelancers bid on them, a client accepts one bid
//! (assigning the task), payments are recorded against assigned tasks, and
//! reviews on completed tasks feed each user's running rating.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: validated value types and aggregates with no I/O
//! - **Ports**: repository traits the services depend on
//! - **Adapters**: in-memory and Diesel/`PostgreSQL` implementations
//! - **Services**: orchestration with injected repositories and clock
//!
//! # Modules
//!
//! - [`access`]: authorization gate shared by every mutation
//! - [`identity`]: user accounts, roles, and ratings
//! - [`task`]: task posting and status transitions
//! - [`bid`]: bidding and bid acceptance
//! - [`payment`]: payment records against assigned tasks
//! - [`review`]: reviews and rating recompute
//! - [`http`]: axum router over the services

pub mod access;
pub mod amount;
pub mod bid;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod identity;
pub mod payment;
pub mod review;
pub mod task;
pub mod telemetry;

#[cfg(test)]
mod test_support;
