//! Review aggregate root and its score type.

use super::{ReviewDomainError, ReviewId};
use crate::identity::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Integer review score in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ReviewRating(u8);

impl ReviewRating {
    /// Validates a score.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::RatingOutOfRange`] outside `1..=5`.
    pub fn new(score: i64) -> Result<Self, ReviewDomainError> {
        u8::try_from(score)
            .ok()
            .filter(|value| (1..=5).contains(value))
            .map(Self)
            .ok_or(ReviewDomainError::RatingOutOfRange(score))
    }

    /// Returns the score.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ReviewRating {
    type Error = ReviewDomainError;

    fn try_from(score: i64) -> Result<Self, Self::Error> {
        Self::new(score)
    }
}

impl From<ReviewRating> for u8 {
    fn from(rating: ReviewRating) -> Self {
        rating.0
    }
}

/// Review aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    id: ReviewId,
    task_id: TaskId,
    reviewer_id: UserId,
    reviewed_user_id: UserId,
    rating: ReviewRating,
    comment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReviewData {
    /// Persisted identifier.
    pub id: ReviewId,
    /// Reviewed task.
    pub task_id: TaskId,
    /// Author.
    pub reviewer_id: UserId,
    /// Subject.
    pub reviewed_user_id: UserId,
    /// Score.
    pub rating: ReviewRating,
    /// Free-text comment, possibly empty.
    pub comment: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Writes a review of `reviewed_user_id` on a completed task.
    ///
    /// The reviewer is not required to have taken part in the task.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::TaskNotCompleted`] unless the task is
    /// completed.
    pub fn write(
        task: &Task,
        reviewer_id: UserId,
        reviewed_user_id: UserId,
        rating: ReviewRating,
        comment: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ReviewDomainError> {
        if task.status() != TaskStatus::Completed {
            return Err(ReviewDomainError::TaskNotCompleted {
                task_id: task.id(),
                status: task.status(),
            });
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: ReviewId::new(),
            task_id: task.id(),
            reviewer_id,
            reviewed_user_id,
            rating,
            comment: comment.into().trim().to_owned(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a review from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReviewData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            reviewer_id: data.reviewer_id,
            reviewed_user_id: data.reviewed_user_id,
            rating: data.rating,
            comment: data.comment,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the review identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the reviewed task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn reviewer_id(&self) -> UserId {
        self.reviewer_id
    }

    /// Returns the reviewed user.
    #[must_use]
    pub const fn reviewed_user_id(&self) -> UserId {
        self.reviewed_user_id
    }

    /// Returns the score.
    #[must_use]
    pub const fn rating(&self) -> ReviewRating {
        self.rating
    }

    /// Returns the comment.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
