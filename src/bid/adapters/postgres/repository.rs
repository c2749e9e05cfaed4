//! `PostgreSQL` repository implementation for bid storage.

use super::{
    models::{BidRow, BidTermsChangeset, NewBidRow},
    schema::bids,
};
use crate::bid::{
    domain::{Bid, BidId, BidStatus, BidTerms, PersistedBidData},
    ports::{BidRepository, BidRepositoryError, BidRepositoryResult},
};
use crate::db::{PgPool, run_blocking};
use crate::identity::domain::UserId;
use crate::task::{
    adapters::postgres::{load_task, transition_guarded},
    domain::{Task, TaskId, TaskStatus},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const BIDDER_UNIQUE_CONSTRAINT: &str = "bids_task_id_freelancer_id_key";

/// `PostgreSQL`-backed bid repository.
#[derive(Debug, Clone)]
pub struct PostgresBidRepository {
    pool: PgPool,
}

impl PostgresBidRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> BidRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BidRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(
            &self.pool,
            f,
            BidRepositoryError::persistence,
            BidRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for BidRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl BidRepository for PostgresBidRepository {
    async fn store(&self, bid: &Bid) -> BidRepositoryResult<()> {
        let bid_id = bid.id();
        let task_id = bid.task_id();
        let freelancer_id = bid.freelancer_id();
        let new_row = to_new_row(bid);

        self.run(move |connection| {
            diesel::insert_into(bids::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some(BIDDER_UNIQUE_CONSTRAINT) =>
                    {
                        BidRepositoryError::AlreadyBid {
                            task_id,
                            freelancer_id,
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        BidRepositoryError::DuplicateBid(bid_id)
                    }
                    _ => BidRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, bid: &Bid) -> BidRepositoryResult<()> {
        let bid_id = bid.id();
        let terms = bid.terms();
        let changeset = BidTermsChangeset {
            amount: terms.amount().value(),
            proposed_deadline: terms.proposed_deadline(),
            cover_letter: terms.cover_letter().to_owned(),
            updated_at: bid.updated_at(),
        };

        self.run(move |connection| {
            let updated = diesel::update(bids::table.filter(bids::id.eq(bid_id.into_inner())))
                .set(&changeset)
                .execute(connection)?;
            if updated == 0 {
                return Err(BidRepositoryError::NotFound(bid_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: BidId) -> BidRepositoryResult<Option<Bid>> {
        self.run(move |connection| {
            let row = bids::table
                .filter(bids::id.eq(id.into_inner()))
                .select(BidRow::as_select())
                .first::<BidRow>(connection)
                .optional()?;
            row.map(row_to_bid).transpose()
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> BidRepositoryResult<Vec<Bid>> {
        self.run(move |connection| {
            let rows = bids::table
                .filter(bids::task_id.eq(task_id.into_inner()))
                .select(BidRow::as_select())
                .order((bids::created_at.asc(), bids::id.asc()))
                .load::<BidRow>(connection)?;
            rows.into_iter().map(row_to_bid).collect()
        })
        .await
    }

    async fn commit_acceptance(&self, bid: &Bid, task: &Task) -> BidRepositoryResult<(Bid, Task)> {
        let bid_id = bid.id();
        let accepted_at = bid.updated_at();
        let task = task.clone();

        self.run(move |connection| {
            connection.transaction::<_, BidRepositoryError, _>(|tx_conn| {
                transition_guarded(tx_conn, &task, TaskStatus::Open)?;
                mark_accepted(tx_conn, bid_id, accepted_at)?;
                let accepted = bids::table
                    .filter(bids::id.eq(bid_id.into_inner()))
                    .select(BidRow::as_select())
                    .first::<BidRow>(tx_conn)?;
                Ok((row_to_bid(accepted)?, load_task(tx_conn, task.id())?))
            })
        })
        .await
    }
}

fn mark_accepted(
    connection: &mut PgConnection,
    bid_id: BidId,
    accepted_at: DateTime<Utc>,
) -> BidRepositoryResult<()> {
    let updated = diesel::update(
        bids::table
            .filter(bids::id.eq(bid_id.into_inner()))
            .filter(bids::status.eq(BidStatus::Pending.as_str())),
    )
    .set((
        bids::status.eq(BidStatus::Accepted.as_str()),
        bids::updated_at.eq(accepted_at),
    ))
    .execute(connection)?;
    if updated > 0 {
        return Ok(());
    }

    let stored = bids::table
        .filter(bids::id.eq(bid_id.into_inner()))
        .select(bids::status)
        .first::<String>(connection)
        .optional()?;
    match stored {
        None => Err(BidRepositoryError::NotFound(bid_id)),
        Some(raw) => Err(BidRepositoryError::StatusChanged {
            bid_id,
            actual: BidStatus::try_from(raw.as_str()).map_err(BidRepositoryError::persistence)?,
        }),
    }
}

fn to_new_row(bid: &Bid) -> NewBidRow {
    let terms = bid.terms();
    NewBidRow {
        id: bid.id().into_inner(),
        task_id: bid.task_id().into_inner(),
        freelancer_id: bid.freelancer_id().into_inner(),
        amount: terms.amount().value(),
        proposed_deadline: terms.proposed_deadline(),
        cover_letter: terms.cover_letter().to_owned(),
        status: bid.status().as_str().to_owned(),
        created_at: bid.created_at(),
        updated_at: bid.updated_at(),
    }
}

fn row_to_bid(row: BidRow) -> BidRepositoryResult<Bid> {
    let BidRow {
        id,
        task_id,
        freelancer_id,
        amount,
        proposed_deadline,
        cover_letter,
        status: persisted_status,
        created_at,
        updated_at,
    } = row;

    let status =
        BidStatus::try_from(persisted_status.as_str()).map_err(BidRepositoryError::persistence)?;
    let terms = BidTerms::new(amount, Some(proposed_deadline), cover_letter)
        .map_err(BidRepositoryError::persistence)?;

    Ok(Bid::from_persisted(PersistedBidData {
        id: BidId::from_uuid(id),
        task_id: TaskId::from_uuid(task_id),
        freelancer_id: UserId::from_uuid(freelancer_id),
        terms,
        status,
        created_at,
        updated_at,
    }))
}
