//! Service layer for posting, editing, and transitioning tasks.

use crate::access::{AccessDenied, Actor, authorize};
use crate::error::{Classify, FailureKind};
use crate::identity::domain::Role;
use crate::task::{
    domain::{Task, TaskDetails, TaskDomainError, TaskFilter, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Unvalidated task fields as supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskDetailsRequest {
    /// Task title.
    #[serde(default)]
    pub title: String,
    /// Task description.
    #[serde(default)]
    pub description: String,
    /// Budget; must be greater than zero.
    #[serde(default)]
    pub budget: f64,
    /// Deadline; required.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Optional category.
    #[serde(default)]
    pub category: Option<String>,
    /// Required skills.
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl TaskDetailsRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        budget: f64,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            budget,
            deadline: Some(deadline),
            category: None,
            required_skills: Vec::new(),
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the required skills.
    #[must_use]
    pub fn with_required_skills(mut self, skills: impl IntoIterator<Item = String>) -> Self {
        self.required_skills = skills.into_iter().collect();
        self
    }

    fn into_details(self) -> Result<TaskDetails, TaskDomainError> {
        TaskDetails::new(
            self.title,
            self.description,
            self.budget,
            self.deadline,
            self.category,
            self.required_skills,
        )
    }
}

/// Service-level errors for task registry operations.
#[derive(Debug, Error)]
pub enum TaskRegistryError {
    /// Domain validation or status transition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The authorization gate denied the actor.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
}

impl Classify for TaskRegistryError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(err) if err.is_transition_violation() => FailureKind::Conflict,
            Self::Domain(_) => FailureKind::Validation,
            Self::Repository(err) => classify_repository(err),
            Self::AccessDenied(err) => err.kind(),
            Self::NotFound(_) => FailureKind::NotFound,
        }
    }
}

/// Classifies a task repository failure.
pub(crate) const fn classify_repository(err: &TaskRepositoryError) -> FailureKind {
    match err {
        TaskRepositoryError::NotFound(_) => FailureKind::NotFound,
        TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::StatusChanged { .. } => {
            FailureKind::Conflict
        }
        TaskRepositoryError::Persistence(_) => FailureKind::Internal,
    }
}

/// Result type for task registry service operations.
pub type TaskRegistryResult<T> = Result<T, TaskRegistryError>;

/// Task registry orchestration service.
#[derive(Clone)]
pub struct TaskRegistryService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskRegistryService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Posts a new open task owned by the acting client.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::AccessDenied`] unless the actor is a
    /// client, [`TaskRegistryError::Domain`] for invalid fields, or
    /// [`TaskRegistryError::Repository`] when persistence fails.
    pub async fn create_task(
        &self,
        actor: &Actor,
        request: TaskDetailsRequest,
    ) -> TaskRegistryResult<Task> {
        authorize(actor, Some(Role::Client), None)?;
        let details = request.into_details()?;
        let task = Task::post(actor.id(), details, &*self.clock);
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), client_id = %actor.id(), "task posted");
        Ok(task)
    }

    /// Replaces the editable fields of a task owned by the actor.
    ///
    /// Edits are accepted in every status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::NotFound`] for an unknown task,
    /// [`TaskRegistryError::AccessDenied`] when the actor is not the owner,
    /// [`TaskRegistryError::Domain`] for invalid fields, or
    /// [`TaskRegistryError::Repository`] when the task changed status
    /// concurrently or persistence fails.
    pub async fn update_task(
        &self,
        actor: &Actor,
        task_id: TaskId,
        request: TaskDetailsRequest,
    ) -> TaskRegistryResult<Task> {
        let mut task = self.get_task(task_id).await?;
        authorize(actor, None, Some(task.client_id()))?;
        let details = request.into_details()?;
        let observed = task.status();
        task.revise(details, &*self.clock);
        self.repository.update(&task, observed).await?;
        Ok(task)
    }

    /// Deletes a task owned by the actor.
    ///
    /// Bids and payments referencing the task are not cascaded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::NotFound`] for an unknown task,
    /// [`TaskRegistryError::AccessDenied`] when the actor is not the owner,
    /// or [`TaskRegistryError::Repository`] when persistence fails.
    pub async fn delete_task(&self, actor: &Actor, task_id: TaskId) -> TaskRegistryResult<()> {
        let task = self.get_task(task_id).await?;
        authorize(actor, None, Some(task.client_id()))?;
        self.repository.delete(task_id).await?;
        debug!(%task_id, "task deleted without cascading to bids or payments");
        Ok(())
    }

    /// Returns a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::NotFound`] for an unknown task or
    /// [`TaskRegistryError::Repository`] when lookup fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskRegistryResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskRegistryError::NotFound(task_id))
    }

    /// Lists tasks matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::Repository`] when lookup fails.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> TaskRegistryResult<Vec<Task>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Marks an in-progress task completed.
    ///
    /// System-level trigger for the collaborator that confirms delivery; no
    /// actor check is performed here.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::NotFound`] for an unknown task,
    /// [`TaskRegistryError::Domain`] unless the task is in progress, or
    /// [`TaskRegistryError::Repository`] on concurrent change or persistence
    /// failure.
    pub async fn complete_task(&self, task_id: TaskId) -> TaskRegistryResult<Task> {
        let mut task = self.get_task(task_id).await?;
        let observed = task.status();
        task.complete(&*self.clock)?;
        let task = self.repository.update_status(&task, observed).await?;
        info!(%task_id, "task completed");
        Ok(task)
    }

    /// Marks an in-progress task cancelled, keeping its assignee.
    ///
    /// System-level trigger; no actor check is performed here.
    ///
    /// # Errors
    ///
    /// Same as [`TaskRegistryService::complete_task`].
    pub async fn cancel_task(&self, task_id: TaskId) -> TaskRegistryResult<Task> {
        let mut task = self.get_task(task_id).await?;
        let observed = task.status();
        task.cancel(&*self.clock)?;
        let task = self.repository.update_status(&task, observed).await?;
        info!(%task_id, "task cancelled");
        Ok(task)
    }
}
