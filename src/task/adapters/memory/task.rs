//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Task, TaskFilter, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

/// Task table guarded by the repository lock.
#[derive(Debug, Default)]
pub(crate) struct InMemoryTaskState {
    pub(crate) tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskState {
    /// Writes `task` if the stored status equals `expected`.
    pub(crate) fn replace_if_status(
        &mut self,
        task: &Task,
        expected: TaskStatus,
    ) -> TaskRepositoryResult<()> {
        let stored = self.guarded_mut(task.id(), expected)?;
        *stored = task.clone();
        Ok(())
    }

    /// Writes the lifecycle fields of `task` if the stored status equals
    /// `expected`, returning the stored task.
    pub(crate) fn transition_if_status(
        &mut self,
        task: &Task,
        expected: TaskStatus,
    ) -> TaskRepositoryResult<Task> {
        let stored = self.guarded_mut(task.id(), expected)?;
        stored.adopt_lifecycle(task);
        Ok(stored.clone())
    }

    fn guarded_mut(
        &mut self,
        task_id: TaskId,
        expected: TaskStatus,
    ) -> TaskRepositoryResult<&mut Task> {
        let stored = self
            .tasks
            .get_mut(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;
        if stored.status() != expected {
            return Err(TaskRepositoryError::StatusChanged {
                task_id,
                expected,
                actual: stored.status(),
            });
        }
        Ok(stored)
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the task table for a multi-step write by a sibling adapter.
    pub(crate) fn write_state(
        &self,
    ) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read_state(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<()> {
        self.write_state()?.replace_if_status(task, expected)
    }

    async fn update_status(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<Task> {
        self.write_state()?.transition_if_status(task, expected)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write_state()?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        Ok(self.read_state()?.tasks.get(&id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }
}
