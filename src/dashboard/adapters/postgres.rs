//! Dashboard queries against `PostgreSQL`.

use crate::dashboard::{
    domain::{ActivityEntry, StatusCount, TaskTotals},
    ports::DashboardQueries,
};
use crate::database::PgPool;
use crate::tracking::{
    adapters::postgres::{map_diesel_error, map_pool_error, schema::{agent_activity, tasks}},
    domain::{HookEvent, TaskStatus},
    ports::{StoreError, StoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count_star, sum};
use diesel::pg::PgConnection;
use diesel::prelude::*;

type ActivityTuple = (String, String, Option<String>, DateTime<Utc>);

/// `PostgreSQL`-backed dashboard queries.
#[derive(Debug, Clone)]
pub struct PostgresDashboardQueries {
    pool: PgPool,
}

impl PostgresDashboardQueries {
    /// Creates the query adapter from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(map_pool_error)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

#[async_trait]
impl DashboardQueries for PostgresDashboardQueries {
    async fn task_totals(&self) -> StoreResult<TaskTotals> {
        self.run_blocking(|connection| {
            let (total_tasks, summed) = tasks::table
                .select((count_star(), sum(tasks::actual_cost_usd)))
                .get_result::<(i64, Option<f32>)>(connection)
                .map_err(map_diesel_error)?;
            Ok(TaskTotals {
                total_tasks,
                total_cost_usd: summed.unwrap_or_default(),
            })
        })
        .await
    }

    async fn status_counts(&self) -> StoreResult<Vec<StatusCount>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .group_by(tasks::status)
                .select((tasks::status, count_star()))
                .order(tasks::status.asc())
                .load::<(String, i64)>(connection)
                .map_err(map_diesel_error)?;
            Ok(rows
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status: TaskStatus::from(status),
                    count,
                })
                .collect())
        })
        .await
    }

    async fn recent_activity(&self, limit: i64) -> StoreResult<Vec<ActivityEntry>> {
        let bounded = limit.max(0);
        self.run_blocking(move |connection| {
            let rows = agent_activity::table
                .select((
                    agent_activity::agent_name,
                    agent_activity::hook_event,
                    agent_activity::tool_name,
                    agent_activity::event_at,
                ))
                .order(agent_activity::event_at.desc())
                .limit(bounded)
                .load::<ActivityTuple>(connection)
                .map_err(map_diesel_error)?;
            Ok(rows
                .into_iter()
                .map(|(agent_name, hook_event, tool_name, event_at)| ActivityEntry {
                    agent_name,
                    hook_event: HookEvent::from(hook_event),
                    tool_name,
                    event_at,
                })
                .collect())
        })
        .await
    }
}
