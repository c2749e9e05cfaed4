//! Diesel row models for payment persistence.

use super::schema::payments;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for payment records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub client_id: uuid::Uuid,
    pub freelancer_id: uuid::Uuid,
    pub amount: f64,
    pub status: String,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub payment_gateway: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for payment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub client_id: uuid::Uuid,
    pub freelancer_id: uuid::Uuid,
    pub amount: f64,
    pub status: String,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub payment_gateway: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns written when a payment is settled.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = payments)]
#[diesel(treat_none_as_null = true)]
pub struct PaymentSettlementChangeset {
    pub status: String,
    pub transaction_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}
