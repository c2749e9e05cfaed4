//! Diesel row models for review persistence.

use super::schema::reviews;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for review records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub reviewer_id: uuid::Uuid,
    pub reviewed_user_id: uuid::Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for review records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReviewRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub reviewer_id: uuid::Uuid,
    pub reviewed_user_id: uuid::Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
