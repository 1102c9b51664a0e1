//! Read queries behind the dashboard.

use super::domain::{ActivityEntry, StatusCount, TaskTotals};
use crate::tracking::ports::StoreResult;
use async_trait::async_trait;

/// Aggregate queries the dashboard issues once per render.
///
/// Every method is read-only and independent of the others.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQueries: Send + Sync {
    /// Returns the task count and summed actual cost.
    async fn task_totals(&self) -> StoreResult<TaskTotals>;

    /// Returns task counts grouped by raw status value, ordered by status.
    async fn status_counts(&self) -> StoreResult<Vec<StatusCount>>;

    /// Returns at most `limit` activity rows, newest first.
    async fn recent_activity(&self, limit: i64) -> StoreResult<Vec<ActivityEntry>>;
}
