//! Adapter implementations for the review aggregator.

pub mod memory;
pub mod postgres;
