//! Repository port for reviews and the rating recompute.

use crate::identity::domain::{UserId, UserRating};
use crate::review::domain::{Review, ReviewId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for review repository operations.
pub type ReviewRepositoryResult<T> = Result<T, ReviewRepositoryError>;

/// Review persistence contract.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Inserts `review` and stores the reviewed user's new mean rating as
    /// one atomic step, returning that rating.
    ///
    /// Concurrent calls for the same reviewed user are serialized so the
    /// stored rating always covers every inserted review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::UserNotFound`] when the reviewed user
    /// does not exist, in which case nothing is written.
    async fn store_and_recompute(&self, review: &Review) -> ReviewRepositoryResult<UserRating>;

    /// Lists reviews received by a user, oldest first.
    async fn list_for_user(&self, user_id: UserId) -> ReviewRepositoryResult<Vec<Review>>;
}

/// Errors returned by review repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReviewRepositoryError {
    /// A review with the same identifier already exists.
    #[error("duplicate review identifier: {0}")]
    DuplicateReview(ReviewId),

    /// The reviewed user does not exist.
    #[error("reviewed user not found: {0}")]
    UserNotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReviewRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
