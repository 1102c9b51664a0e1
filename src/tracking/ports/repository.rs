//! Repository ports for tracked-work persistence.

use super::{StoreResult, TaskFilter};
use crate::tracking::domain::{
    ActivityId, AgentActivity, MlflowTrace, Subtask, SubtaskId, Task, TaskDependency, TaskId,
};
use async_trait::async_trait;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::ConstraintViolation`] when the identifier
    /// already exists.
    async fn store(&self, task: &Task) -> StoreResult<()>;

    /// Persists changes to an existing task.
    ///
    /// The stored `actual_cost_usd` and `created_at` are kept as they are;
    /// cost moves only through [`Self::add_cost`].
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> StoreResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Returns tasks matching `filter`, newest first.
    async fn find(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// Counts tasks matching `filter`, ignoring its limit.
    async fn count(&self, filter: &TaskFilter) -> StoreResult<u64>;

    /// Atomically adds `amount_usd` to the task's actual cost and returns the
    /// new total.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::NotFound`] when the task does not exist.
    async fn add_cost(&self, id: TaskId, amount_usd: f32) -> StoreResult<f32>;

    /// Deletes a task, cascading to its subtasks and dependency edges and
    /// detaching its activity events. Returns whether a row was removed.
    async fn delete(&self, id: TaskId) -> StoreResult<bool>;
}

/// Subtask persistence contract.
#[async_trait]
pub trait SubtaskRepository: Send + Sync {
    /// Stores a new subtask.
    ///
    /// # Errors
    ///
    /// Returns [`super::Constraint::MissingReference`] when the parent task
    /// or linked activity does not exist.
    async fn store(&self, subtask: &Subtask) -> StoreResult<()>;

    /// Persists changes to an existing subtask.
    async fn update(&self, subtask: &Subtask) -> StoreResult<()>;

    /// Finds a subtask by identifier.
    async fn find_by_id(&self, id: SubtaskId) -> StoreResult<Option<Subtask>>;

    /// Returns every subtask of `parent`, oldest first.
    async fn find_by_parent(&self, parent: TaskId) -> StoreResult<Vec<Subtask>>;

    /// Deletes a subtask and detaches activity events referencing it.
    async fn delete(&self, id: SubtaskId) -> StoreResult<bool>;
}

/// Dependency-edge persistence contract.
#[async_trait]
pub trait DependencyRepository: Send + Sync {
    /// Stores a new edge.
    ///
    /// # Errors
    ///
    /// Returns [`super::Constraint::SelfDependency`],
    /// [`super::Constraint::DuplicateDependency`] or
    /// [`super::Constraint::MissingReference`] when the edge is rejected.
    async fn store(&self, dependency: &TaskDependency) -> StoreResult<()>;

    /// Returns edges whose blocked end is `task`.
    async fn blockers_of(&self, task: TaskId) -> StoreResult<Vec<TaskDependency>>;

    /// Returns edges whose blocker end is `task`.
    async fn blocked_by(&self, task: TaskId) -> StoreResult<Vec<TaskDependency>>;

    /// Removes the edge between `blocker` and `blocked`, if present.
    async fn delete(&self, blocker: TaskId, blocked: TaskId) -> StoreResult<bool>;
}

/// Activity-log persistence contract. The log is append-only apart from
/// explicit deletion.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Appends an event.
    async fn append(&self, activity: &AgentActivity) -> StoreResult<()>;

    /// Finds an event by identifier.
    async fn find_by_id(&self, id: ActivityId) -> StoreResult<Option<AgentActivity>>;

    /// Returns events attributed to `task`, newest first.
    async fn find_by_task(&self, task: TaskId) -> StoreResult<Vec<AgentActivity>>;

    /// Deletes an event and detaches subtasks that referenced it.
    async fn delete(&self, id: ActivityId) -> StoreResult<bool>;
}

/// Experiment-trace persistence contract.
#[async_trait]
pub trait TraceRepository: Send + Sync {
    /// Stores a synced run.
    async fn store(&self, trace: &MlflowTrace) -> StoreResult<()>;

    /// Returns every stored record for a tracker run.
    async fn find_by_run_id(&self, run_id: &str) -> StoreResult<Vec<MlflowTrace>>;
}

/// Every tracking repository behind one handle.
pub trait TrackingStore:
    TaskRepository + SubtaskRepository + DependencyRepository + ActivityRepository + TraceRepository
{
}

impl<T> TrackingStore for T where
    T: TaskRepository
        + SubtaskRepository
        + DependencyRepository
        + ActivityRepository
        + TraceRepository
{
}
