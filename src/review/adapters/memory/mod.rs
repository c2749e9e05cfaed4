//! In-memory review aggregator adapters.

mod review;

pub use review::InMemoryReviewRepository;
