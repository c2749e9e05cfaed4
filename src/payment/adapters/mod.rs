//! Adapter implementations for the payment ledger.

pub mod memory;
pub mod postgres;
