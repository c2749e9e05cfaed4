//! Adapter implementations for the task registry.

pub mod memory;
pub mod postgres;
