//! Values shown on the dashboard.

use crate::tracking::domain::{HookEvent, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of activity rows shown on the dashboard.
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// Style applied to statuses outside the known vocabulary.
pub const DEFAULT_BADGE_CLASS: &str = "badge badge-default";

/// Task count and summed actual cost across every task.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TaskTotals {
    /// Number of task rows.
    pub total_tasks: i64,
    /// Sum of `actual_cost_usd`; zero when there are no tasks.
    pub total_cost_usd: f32,
}

/// Number of tasks sharing one raw status value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// Status value as stored.
    pub status: TaskStatus,
    /// Tasks with that status.
    pub count: i64,
}

/// One row of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    /// Emitting agent.
    pub agent_name: String,
    /// Hook event kind.
    pub hook_event: HookEvent,
    /// Tool involved, if any.
    pub tool_name: Option<String>,
    /// When the event happened.
    pub event_at: DateTime<Utc>,
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardSnapshot {
    /// Task count and cost.
    pub totals: TaskTotals,
    /// Task counts per status.
    pub status_counts: Vec<StatusCount>,
    /// Newest activity first.
    pub recent_activity: Vec<ActivityEntry>,
}

/// Returns the badge CSS classes for `status`.
///
/// Unrecognised statuses get [`DEFAULT_BADGE_CLASS`].
#[must_use]
pub const fn badge_class(status: &TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "badge badge-pending",
        TaskStatus::InProgress => "badge badge-in-progress",
        TaskStatus::Blocked => "badge badge-blocked",
        TaskStatus::Completed => "badge badge-completed",
        TaskStatus::Failed => "badge badge-failed",
        TaskStatus::Cancelled => "badge badge-cancelled",
        TaskStatus::Other(_) => DEFAULT_BADGE_CLASS,
    }
}
