//! Payment ledger for the marketplace lifecycle engine.
//!
//! Records payments against assigned tasks. Payment status moves
//! independently of task status; no gateway is contacted here.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
