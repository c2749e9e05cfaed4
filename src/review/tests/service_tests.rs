//! Service orchestration tests for the review aggregator.

use std::sync::Arc;

use crate::access::Actor;
use crate::error::{Classify, FailureKind};
use crate::identity::{
    adapters::memory::InMemoryUserRepository,
    domain::{Role, User, UserId},
    services::{IdentityService, RegisterUserRequest},
};
use crate::review::{
    adapters::memory::InMemoryReviewRepository,
    services::{ReviewAggregatorService, ReviewRequest},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId},
    services::TaskRegistryService,
};
use crate::test_support::{client, stored_assigned_task};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type Aggregator =
    ReviewAggregatorService<InMemoryReviewRepository, InMemoryTaskRepository, DefaultClock>;

struct Harness {
    tasks: Arc<InMemoryTaskRepository>,
    identity: IdentityService<InMemoryUserRepository, DefaultClock>,
    registry: TaskRegistryService<InMemoryTaskRepository, DefaultClock>,
    aggregator: Arc<Aggregator>,
}

#[fixture]
fn harness() -> Harness {
    let users = InMemoryUserRepository::new();
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    Harness {
        identity: IdentityService::new(Arc::new(users.clone()), Arc::clone(&clock)),
        registry: TaskRegistryService::new(Arc::clone(&tasks), Arc::clone(&clock)),
        aggregator: Arc::new(ReviewAggregatorService::new(
            Arc::new(InMemoryReviewRepository::new(users)),
            Arc::clone(&tasks),
            clock,
        )),
        tasks,
    }
}

impl Harness {
    async fn register_freelancer(&self) -> User {
        self.identity
            .register(RegisterUserRequest::new(
                format!("{}@example.com", UserId::new()),
                "Ada",
                "Lovelace",
                Role::Freelancer,
            ))
            .await
            .expect("registration should succeed")
    }

    async fn completed_task(&self, owner: &Actor, assignee: UserId) -> Task {
        let task = stored_assigned_task(&self.tasks, owner, assignee).await;
        self.registry
            .complete_task(task.id())
            .await
            .expect("in-progress task completes")
    }
}

fn review_of(task_id: TaskId, subject: UserId, rating: i64) -> ReviewRequest {
    ReviewRequest {
        task_id,
        reviewed_user_id: subject,
        rating,
        comment: "Solid work".to_owned(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rating_is_mean_of_all_reviews(harness: Harness, client: Actor) {
    let subject = harness.register_freelancer().await;
    let task = harness.completed_task(&client, subject.id()).await;

    let mut last = None;
    for score in [5, 3, 4] {
        let recorded = harness
            .aggregator
            .create_review(&client, review_of(task.id(), subject.id(), score))
            .await
            .expect("review creation should succeed");
        last = Some(recorded.rating.value());
    }

    assert_eq!(last, Some(4.0));
    let stored = harness
        .identity
        .find_user(subject.id())
        .await
        .expect("user lookup should succeed");
    assert_eq!(stored.rating().value(), 4.0);
    let listed = harness
        .aggregator
        .list_reviews_for_user(subject.id())
        .await
        .expect("listing should succeed");
    assert_eq!(listed.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn incomplete_task_is_a_bad_request(harness: Harness, client: Actor) {
    let subject = harness.register_freelancer().await;
    let task = stored_assigned_task(&harness.tasks, &client, subject.id()).await;

    let err = harness
        .aggregator
        .create_review(&client, review_of(task.id(), subject.id(), 5))
        .await
        .expect_err("in-progress task cannot be reviewed");

    assert_eq!(err.kind(), FailureKind::BadRequest);
    let stored = harness
        .identity
        .find_user(subject.id())
        .await
        .expect("user lookup should succeed");
    assert_eq!(stored.rating().value(), 0.0);
}

#[rstest]
#[case(0)]
#[case(6)]
#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_score_is_a_validation_error(
    harness: Harness,
    client: Actor,
    #[case] score: i64,
) {
    let subject = harness.register_freelancer().await;
    let task = harness.completed_task(&client, subject.id()).await;

    let err = harness
        .aggregator
        .create_review(&client, review_of(task.id(), subject.id(), score))
        .await
        .expect_err("score out of range");

    assert_eq!(err.kind(), FailureKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_is_not_found(harness: Harness, client: Actor) {
    let subject = harness.register_freelancer().await;

    let err = harness
        .aggregator
        .create_review(&client, review_of(TaskId::new(), subject.id(), 4))
        .await
        .expect_err("unknown task must fail");

    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_subject_is_not_found_and_not_stored(harness: Harness, client: Actor) {
    let task = harness.completed_task(&client, UserId::new()).await;
    let ghost = UserId::new();

    let err = harness
        .aggregator
        .create_review(&client, review_of(task.id(), ghost, 4))
        .await
        .expect_err("unknown subject must fail");

    assert_eq!(err.kind(), FailureKind::NotFound);
    let listed = harness
        .aggregator
        .list_reviews_for_user(ghost)
        .await
        .expect("listing should succeed");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_participant_may_review(harness: Harness, client: Actor) {
    let subject = harness.register_freelancer().await;
    let task = harness.completed_task(&client, subject.id()).await;
    let bystander = crate::test_support::client();

    let recorded = harness
        .aggregator
        .create_review(&bystander, review_of(task.id(), subject.id(), 2))
        .await
        .expect("participation is not checked");

    assert_eq!(recorded.review.reviewer_id(), bystander.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_reviews_all_count(harness: Harness, client: Actor) {
    let subject = harness.register_freelancer().await;
    let task = harness.completed_task(&client, subject.id()).await;

    let handles: Vec<_> = [1, 2, 3, 4, 5, 5, 4, 3, 2, 1]
        .into_iter()
        .map(|score| {
            let aggregator = Arc::clone(&harness.aggregator);
            let request = review_of(task.id(), subject.id(), score);
            tokio::spawn(async move { aggregator.create_review(&client, request).await })
        })
        .collect();
    for handle in handles {
        handle
            .await
            .expect("task should join")
            .expect("review creation should succeed");
    }

    let stored = harness
        .identity
        .find_user(subject.id())
        .await
        .expect("user lookup should succeed");
    assert_eq!(stored.rating().value(), 3.0);
}
