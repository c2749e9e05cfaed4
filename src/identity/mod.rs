//! Identity store for marketplace accounts.
//!
//! Holds user records, their role, and the running review rating. The
//! lifecycle engine reads users through this module and only the review
//! aggregator writes back to them (rating recompute). Credential checks and
//! token issuance are external collaborators and do not live here.
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
