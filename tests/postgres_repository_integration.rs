//! Integration tests for the Diesel adapters against embedded `PostgreSQL`.
//!
//! A single cluster is bootstrapped per test binary with
//! `pg-embed-setup-unpriv`. The marketplace migration is applied once to a
//! template database and every test clones its own database from it.
//! When the cluster cannot be started the tests log why and return early.

#![expect(
    clippy::print_stderr,
    reason = "Cluster availability and cleanup warnings are informational"
)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_cluster;
use rstest::{fixture, rstest};
use tasklance::access::Actor;
use tasklance::bid::{
    adapters::postgres::PostgresBidRepository,
    domain::{Bid, BidStatus, BidTerms},
    ports::{BidRepository, BidRepositoryError},
    services::BidTermsRequest,
};
use tasklance::db::{PgPool, build_pool};
use tasklance::error::{Classify, FailureKind};
use tasklance::http::{AppState, PostgresStack, StaticTokenAuthenticator};
use tasklance::identity::{
    domain::{Role, UserId},
    services::RegisterUserRequest,
};
use tasklance::review::services::ReviewRequest;
use tasklance::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{Task, TaskDetails, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
    services::TaskDetailsRequest,
};
use tokio::runtime::Runtime;

/// Marketplace schema applied to the template database.
const CREATE_TABLES_SQL: &str =
    include_str!("../migrations/2026-10-18-000000_create_marketplace_tables/up.sql");

/// Template database name for the pre-migrated schema.
const TEMPLATE_DB: &str = "tasklance_test_template";

#[fixture]
fn cluster() -> Option<&'static TestCluster> {
    match shared_cluster() {
        Ok(cluster) => Some(cluster),
        Err(err) => {
            eprintln!("embedded PostgreSQL unavailable, skipping: {err}");
            None
        }
    }
}

fn ensure_template(cluster: &TestCluster) -> eyre::Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_TABLES_SQL)
                .map_err(|e| eyre::eyre!("migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| eyre::eyre!("template setup failed: {e}"))
}

fn test_runtime() -> eyre::Result<Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?)
}

/// Database cloned from the template, dropped again when the test ends.
///
/// Declare it before anything holding its pool so the pool closes first.
struct ScratchDatabase {
    cluster: &'static TestCluster,
    name: String,
}

impl ScratchDatabase {
    fn create(cluster: &'static TestCluster, label: &str) -> eyre::Result<Self> {
        ensure_template(cluster)?;
        let name = format!("test_{label}_{}", uuid::Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|e| eyre::eyre!("database creation failed: {e}"))?;
        Ok(Self { cluster, name })
    }

    fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }

    fn pool(&self) -> eyre::Result<PgPool> {
        Ok(build_pool(&self.url(), 4)?)
    }
}

impl Drop for ScratchDatabase {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("warning: failed to drop test database {}: {err}", self.name);
        }
    }
}

fn postgres_state(pool: &PgPool) -> AppState<PostgresStack> {
    AppState::postgres(pool, Arc::new(StaticTokenAuthenticator::default()))
}

async fn register(
    state: &AppState<PostgresStack>,
    email: &str,
    role: Role,
) -> eyre::Result<Actor> {
    let user = state
        .identity
        .register(RegisterUserRequest::new(email, "Ada", "Lovelace", role))
        .await?;
    Ok(Actor::new(user.id(), user.role()))
}

fn task_request() -> TaskDetailsRequest {
    TaskDetailsRequest::new(
        "Ledger export",
        "Port the billing exporter",
        450.0,
        Utc::now() + Duration::days(14),
    )
}

fn bid_terms(cover_letter: &str) -> eyre::Result<BidTerms> {
    Ok(BidTerms::new(
        400.0,
        Some(Utc::now() + Duration::days(10)),
        cover_letter,
    )?)
}

fn task_details(title: &str, budget: f64) -> eyre::Result<TaskDetails> {
    Ok(TaskDetails::new(
        title,
        "Port the billing exporter",
        budget,
        Some(Utc::now() + Duration::days(14)),
        None,
        Vec::new(),
    )?)
}

#[rstest]
fn concurrent_acceptances_assign_the_task_once(
    cluster: Option<&'static TestCluster>,
) -> eyre::Result<()> {
    let Some(cluster) = cluster else {
        return Ok(());
    };
    let database = ScratchDatabase::create(cluster, "acceptance_race")?;
    let state = postgres_state(&database.pool()?);
    let rt = test_runtime()?;

    rt.block_on(async {
        let client = register(&state, "client@example.com", Role::Client).await?;
        let first = register(&state, "first@example.com", Role::Freelancer).await?;
        let second = register(&state, "second@example.com", Role::Freelancer).await?;
        let task = state.tasks.create_task(&client, task_request()).await?;
        let terms = || BidTermsRequest::new(400.0, Utc::now() + Duration::days(10), "Ready");
        let first_bid = state.bids.create_bid(&first, task.id(), terms()).await?;
        let second_bid = state.bids.create_bid(&second, task.id(), terms()).await?;

        let (left, right) = tokio::join!(
            state.bids.accept_bid(&client, first_bid.id()),
            state.bids.accept_bid(&client, second_bid.id()),
        );

        let outcomes = [left, right];
        let winners: Vec<_> = outcomes.iter().filter_map(|o| o.as_ref().ok()).collect();
        let losers: Vec<_> = outcomes.iter().filter_map(|o| o.as_ref().err()).collect();
        eyre::ensure!(winners.len() == 1, "expected one winner, got {}", winners.len());
        eyre::ensure!(
            losers.iter().all(|err| err.kind() == FailureKind::Conflict),
            "losing acceptance must be a conflict: {losers:?}"
        );

        let stored = state.tasks.get_task(task.id()).await?;
        eyre::ensure!(stored.status() == TaskStatus::InProgress, "task must be in progress");
        eyre::ensure!(
            stored.freelancer_id() == winners.first().map(|won| won.bid.freelancer_id()),
            "stored assignee must be the winning bidder"
        );
        let pending = state
            .bids
            .list_bids_for_task(task.id())
            .await?
            .into_iter()
            .filter(|bid| bid.status() == BidStatus::Pending)
            .count();
        eyre::ensure!(pending == 1, "losing bid stays pending");
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn ratings_five_three_four_store_a_mean_of_four(
    cluster: Option<&'static TestCluster>,
) -> eyre::Result<()> {
    let Some(cluster) = cluster else {
        return Ok(());
    };
    let database = ScratchDatabase::create(cluster, "rating_mean")?;
    let state = postgres_state(&database.pool()?);
    let rt = test_runtime()?;

    rt.block_on(async {
        let client = register(&state, "client@example.com", Role::Client).await?;
        let freelancer = register(&state, "freelancer@example.com", Role::Freelancer).await?;
        let task = state.tasks.create_task(&client, task_request()).await?;
        let bid = state
            .bids
            .create_bid(
                &freelancer,
                task.id(),
                BidTermsRequest::new(400.0, Utc::now() + Duration::days(10), "Ready"),
            )
            .await?;
        state.bids.accept_bid(&client, bid.id()).await?;
        state.tasks.complete_task(task.id()).await?;

        let mut last = None;
        for rating in [5, 3, 4] {
            let recorded = state
                .reviews
                .create_review(
                    &client,
                    ReviewRequest {
                        task_id: task.id(),
                        reviewed_user_id: freelancer.id(),
                        rating,
                        comment: String::new(),
                    },
                )
                .await?;
            last = Some(recorded.rating.value());
        }

        eyre::ensure!(last == Some(4.0), "recomputed rating was {last:?}");
        let profile = state.identity.find_user(freelancer.id()).await?;
        eyre::ensure!(
            profile.rating().value() == 4.0,
            "stored rating was {}",
            profile.rating().value()
        );
        let reviews = state.reviews.list_reviews_for_user(freelancer.id()).await?;
        eyre::ensure!(reviews.len() == 3, "all three reviews are stored");
        Ok::<(), eyre::Report>(())
    })
}

#[rstest]
fn second_bid_by_same_freelancer_is_already_bid(
    cluster: Option<&'static TestCluster>,
) -> eyre::Result<()> {
    let Some(cluster) = cluster else {
        return Ok(());
    };
    let database = ScratchDatabase::create(cluster, "already_bid")?;
    let bids = PostgresBidRepository::new(database.pool()?);
    let rt = test_runtime()?;

    let task_id = TaskId::new();
    let freelancer_id = UserId::new();
    let first = Bid::submit(task_id, freelancer_id, bid_terms("First offer")?, &DefaultClock);
    let second = Bid::submit(task_id, freelancer_id, bid_terms("Second offer")?, &DefaultClock);

    rt.block_on(bids.store(&first))?;
    let result = rt.block_on(bids.store(&second));

    eyre::ensure!(
        matches!(
            result,
            Err(BidRepositoryError::AlreadyBid { task_id: t, freelancer_id: f })
                if t == task_id && f == freelancer_id
        ),
        "expected AlreadyBid, got {result:?}"
    );
    let stored = rt.block_on(bids.list_for_task(task_id))?;
    eyre::ensure!(stored.len() == 1, "only the first bid is stored");
    Ok(())
}

#[rstest]
fn acceptance_keeps_edits_committed_after_its_read(
    cluster: Option<&'static TestCluster>,
) -> eyre::Result<()> {
    let Some(cluster) = cluster else {
        return Ok(());
    };
    let database = ScratchDatabase::create(cluster, "acceptance_edit")?;
    let pool = database.pool()?;
    let tasks = PostgresTaskRepository::new(pool.clone());
    let bids = PostgresBidRepository::new(pool);
    let rt = test_runtime()?;

    let task = Task::post(UserId::new(), task_details("Original", 450.0)?, &DefaultClock);
    let freelancer_id = UserId::new();
    let bid = Bid::submit(task.id(), freelancer_id, bid_terms("Ready")?, &DefaultClock);
    rt.block_on(tasks.store(&task))?;
    rt.block_on(bids.store(&bid))?;

    let mut edited = task.clone();
    edited.revise(task_details("Edited title", 999.0)?, &DefaultClock);
    rt.block_on(tasks.update(&edited, TaskStatus::Open))?;
    let mut revised = bid.clone();
    revised.revise(bid_terms("Revised offer")?, &DefaultClock);
    rt.block_on(bids.update(&revised))?;

    let mut stale_task = task;
    stale_task.assign_and_start(freelancer_id, &DefaultClock)?;
    let mut stale_bid = bid;
    stale_bid.accept(&DefaultClock)?;
    let (accepted, assigned) = rt.block_on(bids.commit_acceptance(&stale_bid, &stale_task))?;

    let stored = rt
        .block_on(tasks.find_by_id(assigned.id()))?
        .ok_or_else(|| eyre::eyre!("task disappeared"))?;
    eyre::ensure!(stored.details().title() == "Edited title", "title edit was reverted");
    eyre::ensure!(stored.details().budget().value() == 999.0, "budget edit was reverted");
    eyre::ensure!(stored.status() == TaskStatus::InProgress, "task must be in progress");
    eyre::ensure!(stored.freelancer_id() == Some(freelancer_id), "bidder must be assigned");
    eyre::ensure!(stored == assigned, "commit returns the stored task");
    eyre::ensure!(accepted.status() == BidStatus::Accepted, "bid must be accepted");
    eyre::ensure!(accepted.terms().cover_letter() == "Revised offer", "bid revision was reverted");
    Ok(())
}

#[rstest]
fn stored_task_with_inconsistent_assignment_is_rejected(
    cluster: Option<&'static TestCluster>,
) -> eyre::Result<()> {
    let Some(cluster) = cluster else {
        return Ok(());
    };
    let database = ScratchDatabase::create(cluster, "inconsistent_task")?;
    let task_id = TaskId::new();

    // The schema refuses such rows, so lift the check for this database only.
    let mut conn = PgConnection::establish(&database.url())?;
    conn.batch_execute("ALTER TABLE tasks DROP CONSTRAINT tasks_assignee_matches_status")?;
    diesel::sql_query(concat!(
        "INSERT INTO tasks (id, client_id, title, description, budget, deadline, status, ",
        "freelancer_id) VALUES ($1, $2, 'Broken', 'Open yet assigned', 100, ",
        "NOW() + INTERVAL '7 days', 'open', $3)",
    ))
    .bind::<diesel::sql_types::Uuid, _>(task_id.into_inner())
    .bind::<diesel::sql_types::Uuid, _>(uuid::Uuid::new_v4())
    .bind::<diesel::sql_types::Uuid, _>(uuid::Uuid::new_v4())
    .execute(&mut conn)?;
    drop(conn);

    let tasks = PostgresTaskRepository::new(database.pool()?);
    let rt = test_runtime()?;
    let result = rt.block_on(tasks.find_by_id(task_id));

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::Persistence(_))),
        "inconsistent row must not load: {result:?}"
    );
    Ok(())
}
