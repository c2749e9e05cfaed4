//! Unit tests for the payment ledger.

mod domain_tests;
