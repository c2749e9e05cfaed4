//! In-memory payment ledger adapters.

mod payment;

pub use payment::InMemoryPaymentRepository;
