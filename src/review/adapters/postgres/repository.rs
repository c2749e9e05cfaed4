//! `PostgreSQL` repository implementation for reviews.

use super::{
    models::{NewReviewRow, ReviewRow},
    schema::reviews,
};
use crate::db::{PgPool, run_blocking};
use crate::identity::{
    adapters::postgres::schema::users,
    domain::{UserId, UserRating},
};
use crate::review::{
    domain::{PersistedReviewData, Review, ReviewId, ReviewRating},
    ports::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed review repository.
#[derive(Debug, Clone)]
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> ReviewRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReviewRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(
            &self.pool,
            f,
            ReviewRepositoryError::persistence,
            ReviewRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for ReviewRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn store_and_recompute(&self, review: &Review) -> ReviewRepositoryResult<UserRating> {
        let review_id = review.id();
        let subject = review.reviewed_user_id();
        let recorded_at = review.created_at();
        let new_row = to_new_row(review);

        self.run(move |connection| {
            connection.transaction::<_, ReviewRepositoryError, _>(|tx_conn| {
                // Row lock serializes recomputes for the same subject.
                let locked = users::table
                    .filter(users::id.eq(subject.into_inner()))
                    .select(users::id)
                    .for_update()
                    .first::<uuid::Uuid>(tx_conn)
                    .optional()?;
                if locked.is_none() {
                    return Err(ReviewRepositoryError::UserNotFound(subject));
                }

                diesel::insert_into(reviews::table)
                    .values(&new_row)
                    .execute(tx_conn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ReviewRepositoryError::DuplicateReview(review_id)
                        }
                        _ => ReviewRepositoryError::persistence(err),
                    })?;

                let scores = reviews::table
                    .filter(reviews::reviewed_user_id.eq(subject.into_inner()))
                    .select(reviews::rating)
                    .load::<i16>(tx_conn)?
                    .into_iter()
                    .map(u8::try_from)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(ReviewRepositoryError::persistence)?;
                let rating = UserRating::mean(scores);

                diesel::update(users::table.filter(users::id.eq(subject.into_inner())))
                    .set((
                        users::rating.eq(rating.value()),
                        users::updated_at.eq(recorded_at),
                    ))
                    .execute(tx_conn)?;
                Ok(rating)
            })
        })
        .await
    }

    async fn list_for_user(&self, user_id: UserId) -> ReviewRepositoryResult<Vec<Review>> {
        self.run(move |connection| {
            let rows = reviews::table
                .filter(reviews::reviewed_user_id.eq(user_id.into_inner()))
                .select(ReviewRow::as_select())
                .order((reviews::created_at.asc(), reviews::id.asc()))
                .load::<ReviewRow>(connection)?;
            rows.into_iter().map(row_to_review).collect()
        })
        .await
    }
}

fn to_new_row(review: &Review) -> NewReviewRow {
    NewReviewRow {
        id: review.id().into_inner(),
        task_id: review.task_id().into_inner(),
        reviewer_id: review.reviewer_id().into_inner(),
        reviewed_user_id: review.reviewed_user_id().into_inner(),
        rating: i16::from(review.rating().value()),
        comment: review.comment().to_owned(),
        created_at: review.created_at(),
        updated_at: review.updated_at(),
    }
}

fn row_to_review(row: ReviewRow) -> ReviewRepositoryResult<Review> {
    let rating =
        ReviewRating::new(i64::from(row.rating)).map_err(ReviewRepositoryError::persistence)?;

    Ok(Review::from_persisted(PersistedReviewData {
        id: ReviewId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        reviewer_id: UserId::from_uuid(row.reviewer_id),
        reviewed_user_id: UserId::from_uuid(row.reviewed_user_id),
        rating,
        comment: row.comment,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
