//! Shared fixtures for unit tests across the lifecycle contexts.

use crate::access::Actor;
use crate::bid::services::BidTermsRequest;
use crate::identity::domain::{Role, UserId};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskDetails},
    ports::TaskRepository,
    services::TaskDetailsRequest,
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::fixture;

/// An acting client with a fresh identity.
#[fixture]
pub(crate) fn client() -> Actor {
    Actor::new(UserId::new(), Role::Client)
}

/// An acting freelancer with a fresh identity.
#[fixture]
pub(crate) fn freelancer() -> Actor {
    Actor::new(UserId::new(), Role::Freelancer)
}

/// A valid task posting request due in two weeks.
pub(crate) fn task_request(title: &str) -> TaskDetailsRequest {
    TaskDetailsRequest::new(
        title,
        "Port the billing exporter to the new ledger API",
        450.0,
        Utc::now() + Duration::days(14),
    )
    .with_category("backend")
    .with_required_skills(vec!["rust".to_owned(), "postgres".to_owned()])
}

/// A valid bid on the terms a freelancer would typically offer.
pub(crate) fn bid_request(amount: f64) -> BidTermsRequest {
    BidTermsRequest::new(
        amount,
        Utc::now() + Duration::days(10),
        "Shipped three ledger migrations last year",
    )
}

/// Stores a task owned by `owner` that is already assigned to `assignee`.
pub(crate) async fn stored_assigned_task(
    tasks: &InMemoryTaskRepository,
    owner: &Actor,
    assignee: UserId,
) -> Task {
    let details = TaskDetails::new(
        "Ledger export",
        "Port the billing exporter",
        450.0,
        Some(Utc::now() + Duration::days(14)),
        None,
        Vec::new(),
    )
    .expect("fixture details are valid");
    let mut task = Task::post(owner.id(), details, &DefaultClock);
    task.assign_and_start(assignee, &DefaultClock)
        .expect("fresh task is open");
    tasks.store(&task).await.expect("fixture task stores");
    task
}
