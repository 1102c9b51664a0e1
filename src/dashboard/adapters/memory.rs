//! Dashboard queries answered from the in-memory tracking repository.

use crate::dashboard::{
    domain::{ActivityEntry, StatusCount, TaskTotals},
    ports::DashboardQueries,
};
use crate::tracking::{
    adapters::memory::InMemoryTrackingRepository,
    domain::{AgentActivity, TaskStatus},
    ports::{StoreError, StoreResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;

fn to_entry(event: &AgentActivity) -> ActivityEntry {
    ActivityEntry {
        agent_name: event.agent_name().to_owned(),
        hook_event: event.hook_event().clone(),
        tool_name: event.tool_name().map(str::to_owned),
        event_at: event.event_at(),
    }
}

#[async_trait]
impl DashboardQueries for InMemoryTrackingRepository {
    async fn task_totals(&self) -> StoreResult<TaskTotals> {
        let state = self.read()?;
        let total_tasks = i64::try_from(state.tasks.len()).map_err(StoreError::persistence)?;
        let total_cost_usd = state.tasks.values().map(|task| task.actual_cost_usd()).sum();
        Ok(TaskTotals {
            total_tasks,
            total_cost_usd,
        })
    }

    async fn status_counts(&self) -> StoreResult<Vec<StatusCount>> {
        let state = self.read()?;
        let mut grouped: BTreeMap<String, i64> = BTreeMap::new();
        for task in state.tasks.values() {
            *grouped.entry(task.status().as_str().to_owned()).or_default() += 1;
        }
        Ok(grouped
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: TaskStatus::from(status),
                count,
            })
            .collect())
    }

    async fn recent_activity(&self, limit: i64) -> StoreResult<Vec<ActivityEntry>> {
        let state = self.read()?;
        let mut events: Vec<&AgentActivity> = state.activity.values().collect();
        events.sort_by_key(|event| std::cmp::Reverse(event.event_at()));
        Ok(events
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(to_entry)
            .collect())
    }
}
