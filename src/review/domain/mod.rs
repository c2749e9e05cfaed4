//! Domain model for reviews.

mod error;
mod ids;
mod review;

pub use error::ReviewDomainError;
pub use ids::ReviewId;
pub use review::{PersistedReviewData, Review, ReviewRating};
