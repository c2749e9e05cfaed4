//! Diesel row models for bid persistence.

use super::schema::bids;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for bid records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bids)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BidRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub freelancer_id: uuid::Uuid,
    pub amount: f64,
    pub proposed_deadline: DateTime<Utc>,
    pub cover_letter: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for bid records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bids)]
pub struct NewBidRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub freelancer_id: uuid::Uuid,
    pub amount: f64,
    pub proposed_deadline: DateTime<Utc>,
    pub cover_letter: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Freelancer-editable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bids)]
pub struct BidTermsChangeset {
    pub amount: f64,
    pub proposed_deadline: DateTime<Utc>,
    pub cover_letter: String,
    pub updated_at: DateTime<Utc>,
}
