//! Review aggregator for the marketplace lifecycle engine.
//!
//! Accepts reviews on completed tasks and keeps each reviewed user's
//! running rating equal to the mean of every review they received. The
//! insert and the recompute are one atomic repository step.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
