//! Task creation, status changes, cost accrual and dependency management.

use crate::tracking::{
    domain::{
        NewSubtask, NewTask, Subtask, Task, TaskDependency, TaskId, TaskStatus,
        TrackingDomainError,
    },
    ports::{
        DependencyRepository, StoreError, SubtaskRepository, TaskFilter, TaskRepository,
        TrackingStore,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for task tracking operations.
#[derive(Debug, Error)]
pub enum TrackingServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TrackingDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The addressed task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// A task cannot be marked blocked while nothing blocks it.
    #[error("task {0} has no blockers and cannot be marked blocked")]
    NoBlockers(TaskId),
}

/// Result type for task tracking service operations.
pub type TrackingServiceResult<T> = Result<T, TrackingServiceError>;

/// Orchestrates task, subtask and dependency writes.
#[derive(Clone)]
pub struct TaskTrackingService<R, C>
where
    R: TrackingStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskTrackingService<R, C>
where
    R: TrackingStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task tracking service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Validates and stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError`] when validation fails or the
    /// repository rejects the write.
    pub async fn create_task(&self, request: NewTask) -> TrackingServiceResult<Task> {
        let task = Task::create(request, &*self.clock)?;
        TaskRepository::store(&*self.repository, &task).await?;
        info!(task_id = %task.id(), status = %task.status(), "task created");
        Ok(task)
    }

    /// Looks up a task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Store`] when the lookup fails.
    pub async fn task(&self, id: TaskId) -> TrackingServiceResult<Option<Task>> {
        Ok(TaskRepository::find_by_id(&*self.repository, id).await?)
    }

    /// Lists tasks matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Store`] when the query fails.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> TrackingServiceResult<Vec<Task>> {
        Ok(self.repository.find(filter).await?)
    }

    /// Counts tasks matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Store`] when the query fails.
    pub async fn count_tasks(&self, filter: &TaskFilter) -> TrackingServiceResult<u64> {
        Ok(self.repository.count(filter).await?)
    }

    /// Moves a task to `status`.
    ///
    /// Moving to `blocked` requires at least one recorded blocker.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::TaskNotFound`] for unknown tasks,
    /// [`TrackingServiceError::NoBlockers`] when blocking an unblocked task,
    /// or a domain or store error.
    pub async fn change_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> TrackingServiceResult<Task> {
        let mut task = self.require_task(id).await?;
        if status == TaskStatus::Blocked
            && DependencyRepository::blockers_of(&*self.repository, id)
                .await?
                .is_empty()
        {
            return Err(TrackingServiceError::NoBlockers(id));
        }
        let previous = task.status().clone();
        task.set_status(status, &*self.clock)?;
        TaskRepository::update(&*self.repository, &task).await?;
        info!(task_id = %id, from = %previous, to = %task.status(), "task status changed");
        Ok(task)
    }

    /// Adds an agent-reported cost to a task's running total.
    ///
    /// Missing, zero, negative and non-finite amounts are ignored and yield
    /// `Ok(None)`. Otherwise the new total is returned.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Store`] when the increment fails,
    /// including when the task does not exist.
    pub async fn record_cost(
        &self,
        id: TaskId,
        amount_usd: Option<f32>,
    ) -> TrackingServiceResult<Option<f32>> {
        let Some(amount) = amount_usd.filter(|value| value.is_finite() && *value > 0.0) else {
            debug!(task_id = %id, ?amount_usd, "ignoring non-positive cost");
            return Ok(None);
        };
        let total = self.repository.add_cost(id, amount).await?;
        debug!(task_id = %id, amount, total, "task cost recorded");
        Ok(Some(total))
    }

    /// Deletes a task together with its subtasks and dependency edges.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Store`] when the delete fails.
    pub async fn delete_task(&self, id: TaskId) -> TrackingServiceResult<bool> {
        let removed = TaskRepository::delete(&*self.repository, id).await?;
        if removed {
            info!(task_id = %id, "task deleted");
        }
        Ok(removed)
    }

    /// Validates and stores a subtask under an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::TaskNotFound`] when the parent task
    /// does not exist, or a domain or store error.
    pub async fn add_subtask(&self, request: NewSubtask) -> TrackingServiceResult<Subtask> {
        let subtask = Subtask::create(request, &*self.clock)?;
        self.require_task(subtask.parent_task_id()).await?;
        SubtaskRepository::store(&*self.repository, &subtask).await?;
        info!(
            subtask_id = %subtask.id(),
            task_id = %subtask.parent_task_id(),
            "subtask created"
        );
        Ok(subtask)
    }

    /// Lists the subtasks of a task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Store`] when the query fails.
    pub async fn subtasks(&self, parent: TaskId) -> TrackingServiceResult<Vec<Subtask>> {
        Ok(self.repository.find_by_parent(parent).await?)
    }

    /// Records that `blocker` blocks `blocked`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::SelfDependency`] for a self edge, or
    /// a store constraint violation for duplicate edges and unknown tasks.
    pub async fn add_dependency(
        &self,
        blocker: TaskId,
        blocked: TaskId,
    ) -> TrackingServiceResult<TaskDependency> {
        let dependency = TaskDependency::new(blocker, blocked, &*self.clock)?;
        DependencyRepository::store(&*self.repository, &dependency).await?;
        info!(blocker = %blocker, blocked = %blocked, "dependency recorded");
        Ok(dependency)
    }

    /// Removes the edge between `blocker` and `blocked`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Store`] when the delete fails.
    pub async fn remove_dependency(
        &self,
        blocker: TaskId,
        blocked: TaskId,
    ) -> TrackingServiceResult<bool> {
        Ok(DependencyRepository::delete(&*self.repository, blocker, blocked).await?)
    }

    /// Returns the edges blocking `task`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Store`] when the query fails.
    pub async fn blockers_of(&self, task: TaskId) -> TrackingServiceResult<Vec<TaskDependency>> {
        Ok(self.repository.blockers_of(task).await?)
    }

    /// Returns the edges where `task` is the blocker.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Store`] when the query fails.
    pub async fn blocked_by(&self, task: TaskId) -> TrackingServiceResult<Vec<TaskDependency>> {
        Ok(self.repository.blocked_by(task).await?)
    }

    async fn require_task(&self, id: TaskId) -> TrackingServiceResult<Task> {
        TaskRepository::find_by_id(&*self.repository, id)
            .await?
            .ok_or(TrackingServiceError::TaskNotFound(id))
    }
}
