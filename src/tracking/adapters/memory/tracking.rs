//! In-memory tracking repository mirroring the relational integrity rules.
//!
//! Task deletion cascades to subtasks and dependency edges and detaches
//! activity events; deleting a subtask or an activity event detaches the
//! rows that pointed at it.

use async_trait::async_trait;
use mockable::DefaultClock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::tracking::{
    domain::{
        ActivityId, AgentActivity, MlflowTrace, Subtask, SubtaskId, Task, TaskDependency, TaskId,
    },
    ports::{
        ActivityRepository, Constraint, DependencyRepository, StoreError, StoreResult,
        SubtaskRepository, TaskFilter, TaskRepository, TraceRepository,
    },
};

/// Thread-safe in-memory implementation of every tracking port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackingRepository {
    state: Arc<RwLock<TrackingState>>,
}

#[derive(Debug, Default)]
pub(crate) struct TrackingState {
    pub(crate) tasks: HashMap<TaskId, Task>,
    pub(crate) subtasks: HashMap<SubtaskId, Subtask>,
    pub(crate) dependencies: Vec<TaskDependency>,
    pub(crate) activity: HashMap<ActivityId, AgentActivity>,
    pub(crate) traces: Vec<MlflowTrace>,
}

impl InMemoryTrackingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> StoreResult<RwLockReadGuard<'_, TrackingState>> {
        self.state
            .read()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, TrackingState>> {
        self.state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn primary_key_clash(table: &str) -> StoreError {
    StoreError::ConstraintViolation(Constraint::Other(format!("{table}_pkey")))
}

fn missing(constraint: &str) -> StoreError {
    StoreError::ConstraintViolation(Constraint::MissingReference(constraint.to_owned()))
}

fn matches_filter(task: &Task, filter: &TaskFilter) -> bool {
    filter.status.as_ref().is_none_or(|status| task.status() == status)
        && filter
            .priority
            .as_ref()
            .is_none_or(|priority| task.priority() == priority)
        && filter
            .assigned_agent
            .as_ref()
            .is_none_or(|agent| task.assigned_agent() == Some(agent))
}

fn check_subtask_references(state: &TrackingState, subtask: &Subtask) -> StoreResult<()> {
    if !state.tasks.contains_key(&subtask.parent_task_id()) {
        return Err(missing("subtasks_parent_task_id_fkey"));
    }
    if subtask
        .agent_activity_id()
        .is_some_and(|activity_id| !state.activity.contains_key(&activity_id))
    {
        return Err(missing("fk_subtasks_agent_activity"));
    }
    Ok(())
}

#[async_trait]
impl TaskRepository for InMemoryTrackingRepository {
    async fn store(&self, task: &Task) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(primary_key_clash("tasks"));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> StoreResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or_else(|| StoreError::not_found("task", task.id()))?;
        let mut updated = task.clone();
        updated.keep_stored_totals(stored);
        *stored = updated;
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn find(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let state = self.read()?;
        let mut matched: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| matches_filter(task, filter))
            .cloned()
            .collect();
        matched.sort_by_key(|task| std::cmp::Reverse(task.created_at()));
        matched.truncate(filter.limit_usize());
        Ok(matched)
    }

    async fn count(&self, filter: &TaskFilter) -> StoreResult<u64> {
        let state = self.read()?;
        let total = state
            .tasks
            .values()
            .filter(|task| matches_filter(task, filter))
            .count();
        u64::try_from(total).map_err(StoreError::persistence)
    }

    async fn add_cost(&self, id: TaskId, amount_usd: f32) -> StoreResult<f32> {
        let mut state = self.write()?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("task", id))?;
        Ok(task.accrue_cost(amount_usd, &DefaultClock))
    }

    async fn delete(&self, id: TaskId) -> StoreResult<bool> {
        let mut state = self.write()?;
        if state.tasks.remove(&id).is_none() {
            return Ok(false);
        }
        let orphaned: Vec<SubtaskId> = state
            .subtasks
            .values()
            .filter(|subtask| subtask.parent_task_id() == id)
            .map(Subtask::id)
            .collect();
        for subtask_id in &orphaned {
            state.subtasks.remove(subtask_id);
        }
        state.dependencies.retain(|edge| !edge.touches(id));
        for event in state.activity.values_mut() {
            if event.task_id() == Some(id) {
                event.detach_task();
            }
            if event
                .subtask_id()
                .is_some_and(|subtask_id| orphaned.contains(&subtask_id))
            {
                event.detach_subtask();
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl SubtaskRepository for InMemoryTrackingRepository {
    async fn store(&self, subtask: &Subtask) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.subtasks.contains_key(&subtask.id()) {
            return Err(primary_key_clash("subtasks"));
        }
        check_subtask_references(&state, subtask)?;
        state.subtasks.insert(subtask.id(), subtask.clone());
        Ok(())
    }

    async fn update(&self, subtask: &Subtask) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.subtasks.contains_key(&subtask.id()) {
            return Err(StoreError::not_found("subtask", subtask.id()));
        }
        check_subtask_references(&state, subtask)?;
        state.subtasks.insert(subtask.id(), subtask.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: SubtaskId) -> StoreResult<Option<Subtask>> {
        Ok(self.read()?.subtasks.get(&id).cloned())
    }

    async fn find_by_parent(&self, parent: TaskId) -> StoreResult<Vec<Subtask>> {
        let state = self.read()?;
        let mut children: Vec<Subtask> = state
            .subtasks
            .values()
            .filter(|subtask| subtask.parent_task_id() == parent)
            .cloned()
            .collect();
        children.sort_by_key(Subtask::created_at);
        Ok(children)
    }

    async fn delete(&self, id: SubtaskId) -> StoreResult<bool> {
        let mut state = self.write()?;
        if state.subtasks.remove(&id).is_none() {
            return Ok(false);
        }
        for event in state.activity.values_mut() {
            if event.subtask_id() == Some(id) {
                event.detach_subtask();
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl DependencyRepository for InMemoryTrackingRepository {
    async fn store(&self, dependency: &TaskDependency) -> StoreResult<()> {
        let blocker = dependency.blocker_task_id();
        let blocked = dependency.blocked_task_id();
        if blocker == blocked {
            return Err(StoreError::ConstraintViolation(Constraint::SelfDependency));
        }
        let mut state = self.write()?;
        if !state.tasks.contains_key(&blocker) {
            return Err(missing("task_dependencies_blocker_task_id_fkey"));
        }
        if !state.tasks.contains_key(&blocked) {
            return Err(missing("task_dependencies_blocked_task_id_fkey"));
        }
        if state.dependencies.iter().any(|edge| edge.id() == dependency.id()) {
            return Err(primary_key_clash("task_dependencies"));
        }
        if state
            .dependencies
            .iter()
            .any(|edge| edge.blocker_task_id() == blocker && edge.blocked_task_id() == blocked)
        {
            return Err(StoreError::ConstraintViolation(
                Constraint::DuplicateDependency,
            ));
        }
        state.dependencies.push(*dependency);
        Ok(())
    }

    async fn blockers_of(&self, task: TaskId) -> StoreResult<Vec<TaskDependency>> {
        let state = self.read()?;
        Ok(state
            .dependencies
            .iter()
            .filter(|edge| edge.blocked_task_id() == task)
            .copied()
            .collect())
    }

    async fn blocked_by(&self, task: TaskId) -> StoreResult<Vec<TaskDependency>> {
        let state = self.read()?;
        Ok(state
            .dependencies
            .iter()
            .filter(|edge| edge.blocker_task_id() == task)
            .copied()
            .collect())
    }

    async fn delete(&self, blocker: TaskId, blocked: TaskId) -> StoreResult<bool> {
        let mut state = self.write()?;
        let before = state.dependencies.len();
        state.dependencies.retain(|edge| {
            edge.blocker_task_id() != blocker || edge.blocked_task_id() != blocked
        });
        Ok(state.dependencies.len() != before)
    }
}

#[async_trait]
impl ActivityRepository for InMemoryTrackingRepository {
    async fn append(&self, activity: &AgentActivity) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.activity.contains_key(&activity.id()) {
            return Err(primary_key_clash("agent_activity"));
        }
        if activity
            .task_id()
            .is_some_and(|task_id| !state.tasks.contains_key(&task_id))
        {
            return Err(missing("agent_activity_task_id_fkey"));
        }
        if activity
            .subtask_id()
            .is_some_and(|subtask_id| !state.subtasks.contains_key(&subtask_id))
        {
            return Err(missing("agent_activity_subtask_id_fkey"));
        }
        state.activity.insert(activity.id(), activity.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ActivityId) -> StoreResult<Option<AgentActivity>> {
        Ok(self.read()?.activity.get(&id).cloned())
    }

    async fn find_by_task(&self, task: TaskId) -> StoreResult<Vec<AgentActivity>> {
        let state = self.read()?;
        let mut events: Vec<AgentActivity> = state
            .activity
            .values()
            .filter(|event| event.task_id() == Some(task))
            .cloned()
            .collect();
        events.sort_by_key(|event| std::cmp::Reverse(event.event_at()));
        Ok(events)
    }

    async fn delete(&self, id: ActivityId) -> StoreResult<bool> {
        let mut state = self.write()?;
        if state.activity.remove(&id).is_none() {
            return Ok(false);
        }
        for subtask in state.subtasks.values_mut() {
            if subtask.agent_activity_id() == Some(id) {
                subtask.detach_activity();
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl TraceRepository for InMemoryTrackingRepository {
    async fn store(&self, trace: &MlflowTrace) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.traces.iter().any(|stored| stored.id() == trace.id()) {
            return Err(primary_key_clash("mlflow_traces"));
        }
        state.traces.push(trace.clone());
        Ok(())
    }

    async fn find_by_run_id(&self, run_id: &str) -> StoreResult<Vec<MlflowTrace>> {
        let state = self.read()?;
        let mut matched: Vec<MlflowTrace> = state
            .traces
            .iter()
            .filter(|trace| trace.run_id() == run_id)
            .cloned()
            .collect();
        matched.sort_by_key(|trace| std::cmp::Reverse(trace.start_time()));
        Ok(matched)
    }
}
