//! In-memory repository for review aggregator tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    adapters::memory::InMemoryUserRepository,
    domain::{UserId, UserRating},
};
use crate::review::{
    domain::{Review, ReviewId},
    ports::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};

/// Thread-safe in-memory review repository.
///
/// Shares the user table with an [`InMemoryUserRepository`]; the recompute
/// holds the users lock, then the reviews lock, for its whole duration.
#[derive(Debug, Clone)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<HashMap<ReviewId, Review>>>,
    users: InMemoryUserRepository,
}

impl InMemoryReviewRepository {
    /// Creates an empty review repository over the given user table.
    #[must_use]
    pub fn new(users: InMemoryUserRepository) -> Self {
        Self {
            reviews: Arc::new(RwLock::new(HashMap::new())),
            users,
        }
    }
}

fn poisoned(err: impl ToString) -> ReviewRepositoryError {
    ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn store_and_recompute(&self, review: &Review) -> ReviewRepositoryResult<UserRating> {
        let mut user_state = self.users.write_state().map_err(ReviewRepositoryError::persistence)?;
        let mut reviews = self.reviews.write().map_err(poisoned)?;

        let subject = review.reviewed_user_id();
        let user = user_state
            .users
            .get_mut(&subject)
            .ok_or(ReviewRepositoryError::UserNotFound(subject))?;
        if reviews.contains_key(&review.id()) {
            return Err(ReviewRepositoryError::DuplicateReview(review.id()));
        }

        reviews.insert(review.id(), review.clone());
        let rating = UserRating::mean(
            reviews
                .values()
                .filter(|stored| stored.reviewed_user_id() == subject)
                .map(|stored| stored.rating().value()),
        );
        user.record_rating(rating, review.created_at());
        Ok(rating)
    }

    async fn list_for_user(&self, user_id: UserId) -> ReviewRepositoryResult<Vec<Review>> {
        let reviews = self.reviews.read().map_err(poisoned)?;
        let mut received: Vec<Review> = reviews
            .values()
            .filter(|review| review.reviewed_user_id() == user_id)
            .cloned()
            .collect();
        received.sort_by_key(|review| (review.created_at(), review.id()));
        Ok(received)
    }
}
