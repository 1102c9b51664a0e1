//! Equality filters for task listings.

use crate::tracking::domain::{AgentRole, TaskPriority, TaskStatus};

/// Row cap applied when a filter does not set its own.
pub const DEFAULT_TASK_LIMIT: i64 = 100;

/// Equality filters and a row cap for task queries.
///
/// Results are always ordered newest first by creation time. The limit is
/// ignored by counting queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks with this status.
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority.
    pub priority: Option<TaskPriority>,
    /// Only tasks assigned to this role.
    pub assigned_agent: Option<AgentRole>,
    /// Maximum number of rows returned.
    pub limit: i64,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            assigned_agent: None,
            limit: DEFAULT_TASK_LIMIT,
        }
    }
}

impl TaskFilter {
    /// Restricts results to `status`.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to `priority`.
    #[must_use]
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts results to tasks assigned to `agent`.
    #[must_use]
    pub fn with_assigned_agent(mut self, agent: AgentRole) -> Self {
        self.assigned_agent = Some(agent);
        self
    }

    /// Caps the number of rows returned.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the row cap with negative values clamped to zero.
    #[must_use]
    pub const fn effective_limit(&self) -> i64 {
        if self.limit < 0 { 0 } else { self.limit }
    }

    /// Returns [`Self::effective_limit`] as a `usize`.
    #[must_use]
    pub fn limit_usize(&self) -> usize {
        usize::try_from(self.effective_limit()).unwrap_or(0)
    }
}
