//! Task aggregate root and its status machine.

use super::{ParseTaskStatusError, TaskDomainError, TaskId};
use crate::amount::Amount;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Posted and accepting bids; no freelancer assigned.
    Open,
    /// A bid was accepted and the freelancer is working.
    InProgress,
    /// Work is finished.
    Completed,
    /// Work was called off after assignment.
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether transition to `target` is allowed.
    ///
    /// `open → in_progress` happens only through bid acceptance; both
    /// terminal states are reachable only from `in_progress`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::InProgress)
                | (Self::InProgress, Self::Completed | Self::Cancelled)
        )
    }

    /// Returns whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Validated, client-editable task fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDetails {
    title: String,
    description: String,
    budget: Amount,
    deadline: DateTime<Utc>,
    category: Option<String>,
    required_skills: Vec<String>,
}

impl TaskDetails {
    /// Validates task fields.
    ///
    /// Blank categories become `None`. Skills are trimmed, blank entries
    /// dropped, and duplicates removed while keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title or description is blank,
    /// the deadline is absent, or the budget is not positive.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        budget: f64,
        deadline: Option<DateTime<Utc>>,
        category: Option<String>,
        required_skills: impl IntoIterator<Item = String>,
    ) -> Result<Self, TaskDomainError> {
        let raw_title = title.into();
        let raw_description = description.into();
        if raw_title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        if raw_description.trim().is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        let validated_budget = Amount::new(budget).map_err(TaskDomainError::InvalidBudget)?;
        let validated_deadline = deadline.ok_or(TaskDomainError::MissingDeadline)?;

        let mut skills: Vec<String> = Vec::new();
        for skill in required_skills {
            let trimmed = skill.trim();
            if !trimmed.is_empty() && !skills.iter().any(|known| known == trimmed) {
                skills.push(trimmed.to_owned());
            }
        }

        Ok(Self {
            title: raw_title.trim().to_owned(),
            description: raw_description.trim().to_owned(),
            budget: validated_budget,
            deadline: validated_deadline,
            category: category
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
            required_skills: skills,
        })
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the budget.
    #[must_use]
    pub const fn budget(&self) -> Amount {
        self.budget
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the required skills.
    #[must_use]
    pub fn required_skills(&self) -> &[String] {
        &self.required_skills
    }
}

/// Listing filter for tasks. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
    /// Only tasks in this category (exact match).
    pub category: Option<String>,
}

impl TaskFilter {
    /// Returns whether `task` satisfies the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let status_matches = self.status.is_none_or(|status| task.status() == status);
        let category_matches = self
            .category
            .as_deref()
            .is_none_or(|category| task.details().category() == Some(category));
        status_matches && category_matches
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    id: TaskId,
    client_id: UserId,
    #[serde(flatten)]
    details: TaskDetails,
    status: TaskStatus,
    freelancer_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Persisted owning client.
    pub client_id: UserId,
    /// Persisted editable fields.
    pub details: TaskDetails,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted assignee, if any.
    pub freelancer_id: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Posts a new open, unassigned task owned by `client_id`.
    #[must_use]
    pub fn post(client_id: UserId, details: TaskDetails, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            client_id,
            details,
            status: TaskStatus::Open,
            freelancer_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InconsistentAssignment`] when the stored
    /// status and assignee disagree (`open` must be unassigned, every other
    /// status assigned).
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        let is_open = data.status == TaskStatus::Open;
        if is_open == data.freelancer_id.is_some() {
            return Err(TaskDomainError::InconsistentAssignment {
                task_id: data.id,
                status: data.status.as_str(),
            });
        }

        Ok(Self {
            id: data.id,
            client_id: data.client_id,
            details: data.details,
            status: data.status,
            freelancer_id: data.freelancer_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning client.
    #[must_use]
    pub const fn client_id(&self) -> UserId {
        self.client_id
    }

    /// Returns the client-editable fields.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assigned freelancer, present iff the task is not open.
    #[must_use]
    pub const fn freelancer_id(&self) -> Option<UserId> {
        self.freelancer_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the client-editable fields. Allowed in every status.
    pub fn revise(&mut self, details: TaskDetails, clock: &impl Clock) {
        self.details = details;
        self.touch(clock);
    }

    /// Assigns `freelancer_id` and moves the task from `open` to
    /// `in_progress`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the task is
    /// not open.
    pub fn assign_and_start(
        &mut self,
        freelancer_id: UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::InProgress)?;
        self.freelancer_id = Some(freelancer_id);
        self.touch(clock);
        Ok(())
    }

    /// Marks an in-progress task as completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] unless the task
    /// is in progress.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Completed)?;
        self.touch(clock);
        Ok(())
    }

    /// Marks an in-progress task as cancelled. The assignee is kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] unless the task
    /// is in progress.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Cancelled)?;
        self.touch(clock);
        Ok(())
    }

    /// Copies the status, assignee, and update timestamp of `transitioned`,
    /// keeping this task's details.
    pub(crate) fn adopt_lifecycle(&mut self, transitioned: &Self) {
        self.status = transitioned.status;
        self.freelancer_id = transitioned.freelancer_id;
        self.updated_at = transitioned.updated_at;
    }

    fn transition_to(&mut self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status.as_str(),
                to: target.as_str(),
            });
        }
        self.status = target;
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
