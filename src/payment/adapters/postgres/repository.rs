//! `PostgreSQL` repository implementation for payment storage.

use super::{
    models::{NewPaymentRow, PaymentRow, PaymentSettlementChangeset},
    schema::payments,
};
use crate::amount::Amount;
use crate::db::{PgPool, run_blocking};
use crate::identity::domain::UserId;
use crate::payment::{
    domain::{Payment, PaymentId, PaymentStatus, PersistedPaymentData},
    ports::{PaymentRepository, PaymentRepositoryError, PaymentRepositoryResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed payment repository.
#[derive(Debug, Clone)]
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> PaymentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PaymentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(
            &self.pool,
            f,
            PaymentRepositoryError::persistence,
            PaymentRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn store(&self, payment: &Payment) -> PaymentRepositoryResult<()> {
        let payment_id = payment.id();
        let new_row = to_new_row(payment);

        self.run(move |connection| {
            diesel::insert_into(payments::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        PaymentRepositoryError::DuplicatePayment(payment_id)
                    }
                    _ => PaymentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, payment: &Payment) -> PaymentRepositoryResult<()> {
        let payment_id = payment.id();
        let changeset = PaymentSettlementChangeset {
            status: payment.status().as_str().to_owned(),
            transaction_id: payment.transaction_id().map(str::to_owned),
            updated_at: payment.updated_at(),
        };

        self.run(move |connection| {
            let updated =
                diesel::update(payments::table.filter(payments::id.eq(payment_id.into_inner())))
                    .set(&changeset)
                    .execute(connection)
                    .map_err(PaymentRepositoryError::persistence)?;
            if updated == 0 {
                return Err(PaymentRepositoryError::NotFound(payment_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: PaymentId) -> PaymentRepositoryResult<Option<Payment>> {
        self.run(move |connection| {
            let row = payments::table
                .filter(payments::id.eq(id.into_inner()))
                .select(PaymentRow::as_select())
                .first::<PaymentRow>(connection)
                .optional()
                .map_err(PaymentRepositoryError::persistence)?;
            row.map(row_to_payment).transpose()
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> PaymentRepositoryResult<Vec<Payment>> {
        self.run(move |connection| {
            let rows = payments::table
                .filter(payments::task_id.eq(task_id.into_inner()))
                .select(PaymentRow::as_select())
                .order((payments::created_at.asc(), payments::id.asc()))
                .load::<PaymentRow>(connection)
                .map_err(PaymentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_payment).collect()
        })
        .await
    }
}

fn to_new_row(payment: &Payment) -> NewPaymentRow {
    NewPaymentRow {
        id: payment.id().into_inner(),
        task_id: payment.task_id().into_inner(),
        client_id: payment.client_id().into_inner(),
        freelancer_id: payment.freelancer_id().into_inner(),
        amount: payment.amount().value(),
        status: payment.status().as_str().to_owned(),
        payment_method: payment.payment_method().to_owned(),
        transaction_id: payment.transaction_id().map(str::to_owned),
        payment_gateway: payment.payment_gateway().map(str::to_owned),
        created_at: payment.created_at(),
        updated_at: payment.updated_at(),
    }
}

fn row_to_payment(row: PaymentRow) -> PaymentRepositoryResult<Payment> {
    let status = PaymentStatus::try_from(row.status.as_str())
        .map_err(PaymentRepositoryError::persistence)?;
    let amount = Amount::new(row.amount).map_err(PaymentRepositoryError::persistence)?;

    Ok(Payment::from_persisted(PersistedPaymentData {
        id: PaymentId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        client_id: UserId::from_uuid(row.client_id),
        freelancer_id: UserId::from_uuid(row.freelancer_id),
        amount,
        status,
        payment_method: row.payment_method,
        transaction_id: row.transaction_id,
        payment_gateway: row.payment_gateway,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
