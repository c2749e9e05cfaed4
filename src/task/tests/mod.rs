//! Unit tests for the task registry.

mod service_tests;
