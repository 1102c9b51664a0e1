//! `PostgreSQL` repository implementation for tracked-work storage.

use super::{
    convert::{
        activity_to_row, dependency_to_row, row_to_activity, row_to_dependency, row_to_subtask,
        row_to_task, row_to_trace, subtask_to_row, task_to_row, trace_to_row,
    },
    map_diesel_error, map_pool_error,
    models::{ActivityRow, DependencyRow, SubtaskRow, TaskRow, TraceRow},
    schema::{agent_activity, mlflow_traces, subtasks, task_dependencies, tasks},
};
use crate::database::PgPool;
use crate::tracking::{
    domain::{
        ActivityId, AgentActivity, MlflowTrace, Subtask, SubtaskId, Task, TaskDependency, TaskId,
    },
    ports::{
        ActivityRepository, DependencyRepository, StoreError, StoreResult, SubtaskRepository,
        TaskFilter, TaskRepository, TraceRepository,
    },
};
use async_trait::async_trait;
use diesel::dsl::now;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;

/// `PostgreSQL`-backed implementation of every tracking port.
///
/// Referential actions (cascades and set-null detachment) are performed by
/// the database's foreign keys.
#[derive(Debug, Clone)]
pub struct PostgresTrackingRepository {
    pool: PgPool,
}

impl PostgresTrackingRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
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

fn filtered_tasks(filter: &TaskFilter) -> tasks::BoxedQuery<'static, Pg> {
    let mut query = tasks::table.into_boxed();
    if let Some(status) = &filter.status {
        query = query.filter(tasks::status.eq(status.as_str().to_owned()));
    }
    if let Some(priority) = &filter.priority {
        query = query.filter(tasks::priority.eq(priority.as_str().to_owned()));
    }
    if let Some(agent) = &filter.assigned_agent {
        query = query.filter(tasks::assigned_agent.eq(agent.as_str().to_owned()));
    }
    query
}

#[async_trait]
impl TaskRepository for PostgresTrackingRepository {
    async fn store(&self, task: &Task) -> StoreResult<()> {
        let row = task_to_row(task);
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> StoreResult<()> {
        let task_id = task.id();
        let row = task_to_row(task);
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(map_diesel_error)?;
            if updated == 0 {
                return Err(StoreError::not_found("task", task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> StoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(map_diesel_error)?;
            Ok(row.map(row_to_task))
        })
        .await
    }

    async fn find(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let query_filter = filter.clone();
        self.run_blocking(move |connection| {
            let rows = filtered_tasks(&query_filter)
                .order(tasks::created_at.desc())
                .limit(query_filter.effective_limit())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_task).collect())
        })
        .await
    }

    async fn count(&self, filter: &TaskFilter) -> StoreResult<u64> {
        let query_filter = filter.clone();
        self.run_blocking(move |connection| {
            let total = filtered_tasks(&query_filter)
                .count()
                .get_result::<i64>(connection)
                .map_err(map_diesel_error)?;
            u64::try_from(total).map_err(StoreError::persistence)
        })
        .await
    }

    async fn add_cost(&self, id: TaskId, amount_usd: f32) -> StoreResult<f32> {
        self.run_blocking(move |connection| {
            diesel::update(tasks::table.find(id.into_inner()))
                .set((
                    tasks::actual_cost_usd.eq(tasks::actual_cost_usd + amount_usd),
                    tasks::updated_at.eq(now),
                ))
                .returning(tasks::actual_cost_usd)
                .get_result::<f32>(connection)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| StoreError::not_found("task", id))
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> StoreResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(removed > 0)
        })
        .await
    }
}

#[async_trait]
impl SubtaskRepository for PostgresTrackingRepository {
    async fn store(&self, subtask: &Subtask) -> StoreResult<()> {
        let row = subtask_to_row(subtask);
        self.run_blocking(move |connection| {
            diesel::insert_into(subtasks::table)
                .values(&row)
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, subtask: &Subtask) -> StoreResult<()> {
        let subtask_id = subtask.id();
        let row = subtask_to_row(subtask);
        self.run_blocking(move |connection| {
            let updated = diesel::update(subtasks::table.find(subtask_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(map_diesel_error)?;
            if updated == 0 {
                return Err(StoreError::not_found("subtask", subtask_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: SubtaskId) -> StoreResult<Option<Subtask>> {
        self.run_blocking(move |connection| {
            let row = subtasks::table
                .find(id.into_inner())
                .select(SubtaskRow::as_select())
                .first::<SubtaskRow>(connection)
                .optional()
                .map_err(map_diesel_error)?;
            Ok(row.map(row_to_subtask))
        })
        .await
    }

    async fn find_by_parent(&self, parent: TaskId) -> StoreResult<Vec<Subtask>> {
        self.run_blocking(move |connection| {
            let rows = subtasks::table
                .filter(subtasks::parent_task_id.eq(parent.into_inner()))
                .order(subtasks::created_at.asc())
                .select(SubtaskRow::as_select())
                .load::<SubtaskRow>(connection)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_subtask).collect())
        })
        .await
    }

    async fn delete(&self, id: SubtaskId) -> StoreResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(subtasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(removed > 0)
        })
        .await
    }
}

#[async_trait]
impl DependencyRepository for PostgresTrackingRepository {
    async fn store(&self, dependency: &TaskDependency) -> StoreResult<()> {
        let row = dependency_to_row(dependency);
        self.run_blocking(move |connection| {
            diesel::insert_into(task_dependencies::table)
                .values(&row)
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn blockers_of(&self, task: TaskId) -> StoreResult<Vec<TaskDependency>> {
        self.run_blocking(move |connection| {
            let rows = task_dependencies::table
                .filter(task_dependencies::blocked_task_id.eq(task.into_inner()))
                .order(task_dependencies::created_at.asc())
                .select(DependencyRow::as_select())
                .load::<DependencyRow>(connection)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_dependency).collect())
        })
        .await
    }

    async fn blocked_by(&self, task: TaskId) -> StoreResult<Vec<TaskDependency>> {
        self.run_blocking(move |connection| {
            let rows = task_dependencies::table
                .filter(task_dependencies::blocker_task_id.eq(task.into_inner()))
                .order(task_dependencies::created_at.asc())
                .select(DependencyRow::as_select())
                .load::<DependencyRow>(connection)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_dependency).collect())
        })
        .await
    }

    async fn delete(&self, blocker: TaskId, blocked: TaskId) -> StoreResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                task_dependencies::table
                    .filter(task_dependencies::blocker_task_id.eq(blocker.into_inner()))
                    .filter(task_dependencies::blocked_task_id.eq(blocked.into_inner())),
            )
            .execute(connection)
            .map_err(map_diesel_error)?;
            Ok(removed > 0)
        })
        .await
    }
}

#[async_trait]
impl ActivityRepository for PostgresTrackingRepository {
    async fn append(&self, activity: &AgentActivity) -> StoreResult<()> {
        let row = activity_to_row(activity);
        self.run_blocking(move |connection| {
            diesel::insert_into(agent_activity::table)
                .values(&row)
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ActivityId) -> StoreResult<Option<AgentActivity>> {
        self.run_blocking(move |connection| {
            let row = agent_activity::table
                .find(id.into_inner())
                .select(ActivityRow::as_select())
                .first::<ActivityRow>(connection)
                .optional()
                .map_err(map_diesel_error)?;
            Ok(row.map(row_to_activity))
        })
        .await
    }

    async fn find_by_task(&self, task: TaskId) -> StoreResult<Vec<AgentActivity>> {
        self.run_blocking(move |connection| {
            let rows = agent_activity::table
                .filter(agent_activity::task_id.eq(task.into_inner()))
                .order(agent_activity::event_at.desc())
                .select(ActivityRow::as_select())
                .load::<ActivityRow>(connection)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_activity).collect())
        })
        .await
    }

    async fn delete(&self, id: ActivityId) -> StoreResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(agent_activity::table.find(id.into_inner()))
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(removed > 0)
        })
        .await
    }
}

#[async_trait]
impl TraceRepository for PostgresTrackingRepository {
    async fn store(&self, trace: &MlflowTrace) -> StoreResult<()> {
        let row = trace_to_row(trace);
        self.run_blocking(move |connection| {
            diesel::insert_into(mlflow_traces::table)
                .values(&row)
                .execute(connection)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await
    }

    async fn find_by_run_id(&self, run_id: &str) -> StoreResult<Vec<MlflowTrace>> {
        let lookup = run_id.to_owned();
        self.run_blocking(move |connection| {
            let rows = mlflow_traces::table
                .filter(mlflow_traces::run_id.eq(lookup))
                .order(mlflow_traces::start_time.desc())
                .select(TraceRow::as_select())
                .load::<TraceRow>(connection)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(row_to_trace).collect())
        })
        .await
    }
}
