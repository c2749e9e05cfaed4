//! Unit tests for the review aggregator.

mod service_tests;
