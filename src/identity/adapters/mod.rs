//! Adapter implementations for the identity store.

pub mod memory;
pub mod postgres;
