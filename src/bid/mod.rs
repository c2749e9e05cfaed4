//! Bid ledger for the marketplace lifecycle engine.
//!
//! Owns bids scoped to a task. Enforces one bid per freelancer per task and
//! at most one accepted bid per task; acceptance assigns the task in the
//! same atomic write.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
