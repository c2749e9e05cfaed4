//! Task registry for the marketplace lifecycle engine.
//!
//! Owns task postings and their status field. A task is posted `open` by a
//! client, moves to `in_progress` only through bid acceptance (which also
//! records the assigned freelancer), and ends `completed` or `cancelled`
//! through system-level triggers. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
