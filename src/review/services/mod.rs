//! Application services for the review aggregator.

mod aggregator;

pub use aggregator::{
    RecordedReview, ReviewAggregatorError, ReviewAggregatorResult, ReviewAggregatorService,
    ReviewRequest,
};
