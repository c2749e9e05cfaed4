//! Service orchestration tests for the task registry.

use std::sync::Arc;

use crate::access::{AccessDenied, Actor};
use crate::error::{Classify, FailureKind};
use crate::identity::domain::UserId;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskFilter, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    services::{TaskDetailsRequest, TaskRegistryError, TaskRegistryService},
};
use crate::test_support::{client, freelancer, task_request};
use async_trait::async_trait;
use mockable::DefaultClock;
use mockall::mock;
use rstest::{fixture, rstest};

type TestService = TaskRegistryService<InMemoryTaskRepository, DefaultClock>;

#[fixture]
fn repository() -> Arc<InMemoryTaskRepository> {
    Arc::new(InMemoryTaskRepository::new())
}

#[fixture]
fn service(repository: Arc<InMemoryTaskRepository>) -> TestService {
    TaskRegistryService::new(repository, Arc::new(DefaultClock))
}

mock! {
    Tasks {}

    #[async_trait]
    impl TaskRepository for Tasks {
        async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;
        async fn update(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<()>;
        async fn update_status(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<Task>;
        async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
        async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;
        async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_posts_open_task(service: TestService, client: Actor) {
    let created = service
        .create_task(&client, task_request("Ledger export"))
        .await
        .expect("task creation should succeed");

    assert_eq!(created.status(), TaskStatus::Open);
    assert_eq!(created.client_id(), client.id());
    assert_eq!(created.freelancer_id(), None);
    let fetched = service
        .get_task(created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn freelancer_cannot_post_task(service: TestService, freelancer: Actor) {
    let result = service
        .create_task(&freelancer, task_request("Ledger export"))
        .await;

    assert!(matches!(
        result,
        Err(TaskRegistryError::AccessDenied(AccessDenied::RoleRequired { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_budget_is_a_validation_error(service: TestService, client: Actor) {
    let mut request = task_request("Ledger export");
    request.budget = 0.0;

    let err = service
        .create_task(&client, request)
        .await
        .expect_err("zero budget must be rejected");

    assert_eq!(err.kind(), FailureKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_fields_are_a_validation_error(service: TestService, client: Actor) {
    let err = service
        .create_task(&client, TaskDetailsRequest::default())
        .await
        .expect_err("empty request must be rejected");

    assert_eq!(err.kind(), FailureKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_updates_task_in_any_status(
    repository: Arc<InMemoryTaskRepository>,
    client: Actor,
) {
    let service: TestService =
        TaskRegistryService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    let created = service
        .create_task(&client, task_request("Ledger export"))
        .await
        .expect("task creation should succeed");
    let mut assigned = created.clone();
    assigned
        .assign_and_start(UserId::new(), &DefaultClock)
        .expect("assignment succeeds");
    repository
        .update(&assigned, TaskStatus::Open)
        .await
        .expect("assignment persists");

    let updated = service
        .update_task(&client, created.id(), task_request("Ledger export v2"))
        .await
        .expect("owner may edit an in-progress task");

    assert_eq!(updated.details().title(), "Ledger export v2");
    assert_eq!(updated.status(), TaskStatus::InProgress);
    assert_eq!(updated.freelancer_id(), assigned.freelancer_id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_owner_cannot_update_or_delete(service: TestService, client: Actor) {
    let created = service
        .create_task(&client, task_request("Ledger export"))
        .await
        .expect("task creation should succeed");
    let intruder = crate::test_support::client();

    let update = service
        .update_task(&intruder, created.id(), task_request("Hijacked"))
        .await
        .expect_err("non-owner update must fail");
    let delete = service
        .delete_task(&intruder, created.id())
        .await
        .expect_err("non-owner delete must fail");

    assert_eq!(update.kind(), FailureKind::Forbidden);
    assert_eq!(delete.kind(), FailureKind::Forbidden);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_is_not_found(service: TestService, client: Actor) {
    let err = service
        .update_task(&client, TaskId::new(), task_request("Ledger export"))
        .await
        .expect_err("unknown task must fail");

    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_deletes_task(service: TestService, client: Actor) {
    let created = service
        .create_task(&client, task_request("Ledger export"))
        .await
        .expect("task creation should succeed");

    service
        .delete_task(&client, created.id())
        .await
        .expect("owner delete should succeed");

    let lookup = service.get_task(created.id()).await;
    assert!(matches!(lookup, Err(TaskRegistryError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_category(service: TestService, client: Actor) {
    service
        .create_task(&client, task_request("Backend job"))
        .await
        .expect("task creation should succeed");
    service
        .create_task(&client, task_request("Logo refresh").with_category("design"))
        .await
        .expect("task creation should succeed");

    let design = service
        .list_tasks(&TaskFilter {
            category: Some("design".to_owned()),
            ..TaskFilter::default()
        })
        .await
        .expect("listing should succeed");
    let all = service
        .list_tasks(&TaskFilter::default())
        .await
        .expect("listing should succeed");

    assert_eq!(design.len(), 1);
    assert_eq!(all.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_task_cannot_be_completed(service: TestService, client: Actor) {
    let created = service
        .create_task(&client, task_request("Ledger export"))
        .await
        .expect("task creation should succeed");

    let err = service
        .complete_task(created.id())
        .await
        .expect_err("open task cannot complete");

    assert_eq!(err.kind(), FailureKind::Conflict);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_status_write_is_a_conflict(
    repository: Arc<InMemoryTaskRepository>,
    client: Actor,
) {
    let service: TestService =
        TaskRegistryService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    let created = service
        .create_task(&client, task_request("Ledger export"))
        .await
        .expect("task creation should succeed");

    let err = repository
        .update(&created, TaskStatus::InProgress)
        .await
        .expect_err("guarded write must fail");

    assert!(matches!(
        err,
        TaskRepositoryError::StatusChanged {
            expected: TaskStatus::InProgress,
            actual: TaskStatus::Open,
            ..
        }
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn persistence_failure_is_internal(client: Actor) {
    let mut tasks = MockTasks::new();
    tasks.expect_store().returning(|_| {
        Err(TaskRepositoryError::persistence(std::io::Error::other(
            "connection reset",
        )))
    });
    let service = TaskRegistryService::new(Arc::new(tasks), Arc::new(DefaultClock));

    let err = service
        .create_task(&client, task_request("Ledger export"))
        .await
        .expect_err("store failure must surface");

    assert_eq!(err.kind(), FailureKind::Internal);
}
