//! Domain model for bids.

mod bid;
mod error;
mod ids;

pub use bid::{Bid, BidStatus, BidTerms, PersistedBidData};
pub use error::{BidDomainError, ParseBidStatusError};
pub use ids::BidId;
