//! Service layer for writing reviews and reading a user's reviews.

use crate::access::Actor;
use crate::error::{Classify, FailureKind};
use crate::identity::domain::{UserId, UserRating};
use crate::review::{
    domain::{Review, ReviewDomainError, ReviewRating},
    ports::{ReviewRepository, ReviewRepositoryError},
};
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
    services::classify_repository as classify_task_repository,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Fields supplied by the author of a review.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewRequest {
    /// Task being reviewed.
    pub task_id: TaskId,
    /// User being reviewed.
    pub reviewed_user_id: UserId,
    /// Score in `1..=5`.
    #[serde(default)]
    pub rating: i64,
    /// Optional comment.
    #[serde(default)]
    pub comment: String,
}

/// A stored review together with the reviewed user's refreshed rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedReview {
    /// Stored review.
    pub review: Review,
    /// Reviewed user's rating after the recompute.
    pub rating: UserRating,
}

/// Service-level errors for review aggregator operations.
#[derive(Debug, Error)]
pub enum ReviewAggregatorError {
    /// Score out of range or task not completed.
    #[error(transparent)]
    Domain(#[from] ReviewDomainError),
    /// Review repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReviewRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
}

impl Classify for ReviewAggregatorError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(ReviewDomainError::RatingOutOfRange(_)) => FailureKind::Validation,
            Self::Domain(ReviewDomainError::TaskNotCompleted { .. }) => FailureKind::BadRequest,
            Self::Repository(err) => match err {
                ReviewRepositoryError::UserNotFound(_) => FailureKind::NotFound,
                ReviewRepositoryError::DuplicateReview(_) => FailureKind::Conflict,
                ReviewRepositoryError::Persistence(_) => FailureKind::Internal,
            },
            Self::TaskRepository(err) => classify_task_repository(err),
            Self::TaskNotFound(_) => FailureKind::NotFound,
        }
    }
}

/// Result type for review aggregator service operations.
pub type ReviewAggregatorResult<T> = Result<T, ReviewAggregatorError>;

/// Review aggregator orchestration service.
#[derive(Clone)]
pub struct ReviewAggregatorService<R, T, C>
where
    R: ReviewRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    reviews: Arc<R>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<R, T, C> ReviewAggregatorService<R, T, C>
where
    R: ReviewRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new review aggregator service.
    #[must_use]
    pub const fn new(reviews: Arc<R>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            reviews,
            tasks,
            clock,
        }
    }

    /// Stores a review on a completed task and recomputes the reviewed
    /// user's rating in the same step.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAggregatorError::Domain`] for an out-of-range score or
    /// a task that is not completed, [`ReviewAggregatorError::TaskNotFound`]
    /// for an unknown task, or [`ReviewAggregatorError::Repository`] when the
    /// reviewed user is unknown or persistence fails.
    pub async fn create_review(
        &self,
        actor: &Actor,
        request: ReviewRequest,
    ) -> ReviewAggregatorResult<RecordedReview> {
        let rating = ReviewRating::new(request.rating)?;
        let task = self
            .tasks
            .find_by_id(request.task_id)
            .await?
            .ok_or(ReviewAggregatorError::TaskNotFound(request.task_id))?;

        let is_participant =
            actor.id() == task.client_id() || Some(actor.id()) == task.freelancer_id();
        if !is_participant {
            debug!(task_id = %task.id(), reviewer_id = %actor.id(), "review written by a non-participant");
        }

        let review = Review::write(
            &task,
            actor.id(),
            request.reviewed_user_id,
            rating,
            request.comment,
            &*self.clock,
        )?;
        let refreshed = self.reviews.store_and_recompute(&review).await?;
        info!(
            review_id = %review.id(),
            reviewed_user_id = %review.reviewed_user_id(),
            rating = refreshed.value(),
            "review recorded"
        );
        Ok(RecordedReview {
            review,
            rating: refreshed,
        })
    }

    /// Lists the reviews a user has received.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAggregatorError::Repository`] when lookup fails.
    pub async fn list_reviews_for_user(&self, user_id: UserId) -> ReviewAggregatorResult<Vec<Review>> {
        Ok(self.reviews.list_for_user(user_id).await?)
    }
}
