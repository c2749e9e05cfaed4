//! In-memory bid ledger adapters.

mod bid;

pub use bid::InMemoryBidRepository;
