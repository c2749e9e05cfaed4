//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskLifecycleChangeset, TaskRow},
    schema::tasks,
};
use crate::db::{PgPool, run_blocking};
use crate::identity::domain::UserId;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskDetails, TaskFilter, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(
            &self.pool,
            f,
            TaskRepositoryError::persistence,
            TaskRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task);

        self.run(move |connection| write_guarded(connection, task_id, &changeset, expected))
            .await
    }

    async fn update_status(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<Task> {
        let task = task.clone();

        self.run(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx_conn| {
                transition_guarded(tx_conn, &task, expected)?;
                load_task(tx_conn, task.id())
            })
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let status = filter.status;
        let category = filter.category.clone();

        self.run(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(wanted) = status {
                query = query.filter(tasks::status.eq(wanted.as_str()));
            }
            if let Some(wanted) = category {
                query = query.filter(tasks::category.eq(wanted));
            }
            let rows = query
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

/// Writes `changeset` to a task only while its stored status equals
/// `expected`.
fn write_guarded(
    connection: &mut PgConnection,
    task_id: TaskId,
    changeset: &TaskChangeset,
    expected: TaskStatus,
) -> TaskRepositoryResult<()> {
    let updated = diesel::update(
        tasks::table
            .filter(tasks::id.eq(task_id.into_inner()))
            .filter(tasks::status.eq(expected.as_str())),
    )
    .set(changeset)
    .execute(connection)
    .map_err(TaskRepositoryError::persistence)?;
    if updated > 0 {
        return Ok(());
    }
    Err(guard_miss(connection, task_id, expected)?)
}

/// Writes the status, assignee, and update timestamp of `task` while its
/// stored status equals `expected`. Stored details are left as they are.
pub(crate) fn transition_guarded(
    connection: &mut PgConnection,
    task: &Task,
    expected: TaskStatus,
) -> TaskRepositoryResult<()> {
    let task_id = task.id();
    let changeset = TaskLifecycleChangeset {
        status: task.status().as_str().to_owned(),
        freelancer_id: task.freelancer_id().map(UserId::into_inner),
        updated_at: task.updated_at(),
    };
    let updated = diesel::update(
        tasks::table
            .filter(tasks::id.eq(task_id.into_inner()))
            .filter(tasks::status.eq(expected.as_str())),
    )
    .set(&changeset)
    .execute(connection)
    .map_err(TaskRepositoryError::persistence)?;
    if updated > 0 {
        return Ok(());
    }
    Err(guard_miss(connection, task_id, expected)?)
}

/// Explains why a guarded write matched no row.
fn guard_miss(
    connection: &mut PgConnection,
    task_id: TaskId,
    expected: TaskStatus,
) -> TaskRepositoryResult<TaskRepositoryError> {
    Ok(match task_status_of(connection, task_id)? {
        None => TaskRepositoryError::NotFound(task_id),
        Some(actual) => TaskRepositoryError::StatusChanged {
            task_id,
            expected,
            actual,
        },
    })
}

/// Loads a stored task, failing with `NotFound` when it is absent.
pub(crate) fn load_task(
    connection: &mut PgConnection,
    task_id: TaskId,
) -> TaskRepositoryResult<Task> {
    let row = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)?
        .ok_or(TaskRepositoryError::NotFound(task_id))?;
    row_to_task(row)
}

/// Reads the stored status of a task, if it exists.
fn task_status_of(
    connection: &mut PgConnection,
    task_id: TaskId,
) -> TaskRepositoryResult<Option<TaskStatus>> {
    let persisted = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .select(tasks::status)
        .first::<String>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)?;
    persisted
        .map(|status| TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence))
        .transpose()
}

fn to_new_row(task: &Task) -> NewTaskRow {
    let details = task.details();
    NewTaskRow {
        id: task.id().into_inner(),
        client_id: task.client_id().into_inner(),
        title: details.title().to_owned(),
        description: details.description().to_owned(),
        budget: details.budget().value(),
        deadline: details.deadline(),
        status: task.status().as_str().to_owned(),
        category: details.category().map(str::to_owned),
        required_skills: details.required_skills().to_vec(),
        freelancer_id: task.freelancer_id().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    let details = task.details();
    TaskChangeset {
        title: details.title().to_owned(),
        description: details.description().to_owned(),
        budget: details.budget().value(),
        deadline: details.deadline(),
        status: task.status().as_str().to_owned(),
        category: details.category().map(str::to_owned),
        required_skills: details.required_skills().to_vec(),
        freelancer_id: task.freelancer_id().map(UserId::into_inner),
        updated_at: task.updated_at(),
    }
}

/// Converts a stored row into the aggregate, re-validating its invariants.
fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        client_id,
        title,
        description,
        budget,
        deadline,
        status: persisted_status,
        category,
        required_skills,
        freelancer_id,
        created_at,
        updated_at,
    } = row;

    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let details = TaskDetails::new(
        title,
        description,
        budget,
        Some(deadline),
        category,
        required_skills,
    )
    .map_err(TaskRepositoryError::persistence)?;

    Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        client_id: UserId::from_uuid(client_id),
        details,
        status,
        freelancer_id: freelancer_id.map(UserId::from_uuid),
        created_at,
        updated_at,
    })
    .map_err(TaskRepositoryError::persistence)
}
