//! Directed "blocks" edges between tasks.

use super::{DependencyId, TaskId, TrackingDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Records that `blocker` must finish before `blocked` can proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDependency {
    id: DependencyId,
    blocker_task_id: TaskId,
    blocked_task_id: TaskId,
    created_at: DateTime<Utc>,
}

impl TaskDependency {
    /// Creates a new edge.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::SelfDependency`] when both ends name
    /// the same task.
    pub fn new(
        blocker_task_id: TaskId,
        blocked_task_id: TaskId,
        clock: &impl Clock,
    ) -> Result<Self, TrackingDomainError> {
        if blocker_task_id == blocked_task_id {
            return Err(TrackingDomainError::SelfDependency(blocker_task_id));
        }
        Ok(Self {
            id: DependencyId::new(),
            blocker_task_id,
            blocked_task_id,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs an edge from storage without validation.
    #[must_use]
    pub const fn from_persisted(
        id: DependencyId,
        blocker_task_id: TaskId,
        blocked_task_id: TaskId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            blocker_task_id,
            blocked_task_id,
            created_at,
        }
    }

    /// Returns the edge identifier.
    #[must_use]
    pub const fn id(&self) -> DependencyId {
        self.id
    }

    /// Returns the task that blocks.
    #[must_use]
    pub const fn blocker_task_id(&self) -> TaskId {
        self.blocker_task_id
    }

    /// Returns the task that is blocked.
    #[must_use]
    pub const fn blocked_task_id(&self) -> TaskId {
        self.blocked_task_id
    }

    /// Returns when the edge was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when `task_id` is either end of the edge.
    #[must_use]
    pub fn touches(&self, task_id: TaskId) -> bool {
        self.blocker_task_id == task_id || self.blocked_task_id == task_id
    }
}
