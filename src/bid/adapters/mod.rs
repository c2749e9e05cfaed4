//! Adapter implementations for the bid ledger.

pub mod memory;
pub mod postgres;
