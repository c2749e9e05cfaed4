//! In-memory integration tests across the task, bid, payment, and review
//! contexts.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use tasklance::access::Actor;
use tasklance::bid::{domain::BidStatus, services::BidTermsRequest};
use tasklance::error::{Classify, FailureKind};
use tasklance::http::{AppState, MemoryStack, StaticTokenAuthenticator};
use tasklance::identity::{
    domain::{Role, UserId},
    services::RegisterUserRequest,
};
use tasklance::payment::{
    adapters::memory::InMemoryPaymentRepository,
    services::{PaymentLedgerService, PaymentRequest},
};
use tasklance::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskStatus},
    ports::TaskRepository,
    services::{TaskDetailsRequest, TaskRegistryService},
};

type State = AppState<MemoryStack>;

#[fixture]
fn state() -> State {
    AppState::in_memory(Arc::new(StaticTokenAuthenticator::default()))
}

async fn register(state: &State, email: &str, role: Role) -> Result<Actor, eyre::Report> {
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

fn terms() -> BidTermsRequest {
    BidTermsRequest::new(400.0, Utc::now() + Duration::days(10), "Ready to start")
}

fn ensure_assignment_invariant(task: &Task) -> Result<(), eyre::Report> {
    eyre::ensure!(
        (task.status() == TaskStatus::Open) == task.freelancer_id().is_none(),
        "task {} is {} with assignee {:?}",
        task.id(),
        task.status(),
        task.freelancer_id()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_acceptances_leave_one_assignee(state: State) -> Result<(), eyre::Report> {
    let client = register(&state, "client@example.com", Role::Client).await?;
    let first = register(&state, "first@example.com", Role::Freelancer).await?;
    let second = register(&state, "second@example.com", Role::Freelancer).await?;
    let task = state.tasks.create_task(&client, task_request()).await?;
    let first_bid = state.bids.create_bid(&first, task.id(), terms()).await?;
    let second_bid = state.bids.create_bid(&second, task.id(), terms()).await?;

    let first_ledger = Arc::clone(&state.bids);
    let second_ledger = Arc::clone(&state.bids);
    let first_handle =
        tokio::spawn(async move { first_ledger.accept_bid(&client, first_bid.id()).await });
    let second_handle =
        tokio::spawn(async move { second_ledger.accept_bid(&client, second_bid.id()).await });
    let outcomes = [first_handle.await?, second_handle.await?];

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().err())
        .filter(|err| err.kind() == FailureKind::Conflict)
        .count();
    eyre::ensure!(winners == 1, "expected one winner, found {winners}");
    eyre::ensure!(conflicts == 1, "expected one conflict, found {conflicts}");

    let stored = state.tasks.get_task(task.id()).await?;
    ensure_assignment_invariant(&stored)?;
    eyre::ensure!(
        stored.freelancer_id() == Some(first.id()) || stored.freelancer_id() == Some(second.id()),
        "assignee is not one of the bidders"
    );
    let accepted = state
        .bids
        .list_bids_for_task(task.id())
        .await?
        .into_iter()
        .filter(|bid| bid.status() == BidStatus::Accepted)
        .count();
    eyre::ensure!(accepted == 1, "expected one accepted bid, found {accepted}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_transition_keeps_assignment_invariant(state: State) -> Result<(), eyre::Report> {
    let client = register(&state, "client@example.com", Role::Client).await?;
    let freelancer = register(&state, "freelancer@example.com", Role::Freelancer).await?;

    let posted = state.tasks.create_task(&client, task_request()).await?;
    ensure_assignment_invariant(&posted)?;
    let bid = state.bids.create_bid(&freelancer, posted.id(), terms()).await?;
    let acceptance = state.bids.accept_bid(&client, bid.id()).await?;
    ensure_assignment_invariant(&acceptance.task)?;
    let completed = state.tasks.complete_task(posted.id()).await?;
    ensure_assignment_invariant(&completed)?;

    let cancel = state.tasks.cancel_task(posted.id()).await;
    let failure = cancel
        .err()
        .ok_or_else(|| eyre::eyre!("completed task must not cancel"))?;
    eyre::ensure!(failure.kind() == FailureKind::Conflict, "unexpected {failure}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn payment_keeps_parties_after_task_edits() -> Result<(), eyre::Report> {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    let registry = TaskRegistryService::new(Arc::clone(&tasks), Arc::clone(&clock));
    let ledger = PaymentLedgerService::new(
        Arc::new(InMemoryPaymentRepository::new()),
        Arc::clone(&tasks),
        clock,
    );
    let client = Actor::new(UserId::new(), Role::Client);
    let freelancer = UserId::new();

    let task = registry.create_task(&client, task_request()).await?;
    let unassigned = ledger
        .create_payment(&client, task.id(), payment())
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("unassigned task must not be paid"))?;
    eyre::ensure!(unassigned.kind() == FailureKind::BadRequest, "unexpected {unassigned}");

    let mut assigned = task.clone();
    assigned.assign_and_start(freelancer, &DefaultClock)?;
    tasks.update(&assigned, TaskStatus::Open).await?;
    let recorded = ledger.create_payment(&client, task.id(), payment()).await?;
    registry
        .update_task(
            &client,
            task.id(),
            task_request().with_category("renamed"),
        )
        .await?;

    let listed = ledger.list_payments_for_task(task.id()).await?;
    eyre::ensure!(listed == vec![recorded], "stored payment drifted");
    let stored = listed
        .first()
        .ok_or_else(|| eyre::eyre!("missing stored payment"))?;
    eyre::ensure!(stored.client_id() == client.id(), "client mismatch");
    eyre::ensure!(stored.freelancer_id() == freelancer, "freelancer mismatch");
    Ok(())
}

fn payment() -> PaymentRequest {
    PaymentRequest {
        amount: 450.0,
        payment_method: "bank_transfer".to_owned(),
        payment_gateway: Some("manual".to_owned()),
    }
}
