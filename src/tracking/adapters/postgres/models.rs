//! Diesel row models for tracked-work persistence.

use super::schema::{agent_activity, mlflow_traces, subtasks, task_dependencies, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub assigned_agent: Option<String>,
    pub session_id: Option<String>,
    pub estimated_cost_usd: f32,
    pub actual_cost_usd: f32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub github_issue_number: Option<i32>,
    pub github_project_item_id: Option<String>,
    pub schema_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for task records.
///
/// `treat_none_as_null` makes updates clear optional columns rather than
/// skipping them. The running cost only moves through `add_cost`, so
/// updates leave it and the creation time untouched.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskWriteRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub assigned_agent: Option<String>,
    pub session_id: Option<String>,
    pub estimated_cost_usd: f32,
    #[diesel(skip_update)]
    pub actual_cost_usd: f32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub github_issue_number: Option<i32>,
    pub github_project_item_id: Option<String>,
    pub schema_version: i32,
    #[diesel(skip_update)]
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for subtask records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subtasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubtaskRow {
    pub id: Uuid,
    pub parent_task_id: Uuid,
    pub subtask_type: String,
    pub title: String,
    pub status: String,
    pub output_summary: Option<String>,
    pub github_issue_number: Option<i32>,
    pub github_project_item_id: Option<String>,
    pub agent_activity_id: Option<Uuid>,
    pub schema_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for subtask records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = subtasks)]
#[diesel(treat_none_as_null = true)]
pub struct SubtaskWriteRow {
    pub id: Uuid,
    pub parent_task_id: Uuid,
    pub subtask_type: String,
    pub title: String,
    pub status: String,
    pub output_summary: Option<String>,
    pub github_issue_number: Option<i32>,
    pub github_project_item_id: Option<String>,
    pub agent_activity_id: Option<Uuid>,
    pub schema_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row for dependency edges, used for both reads and inserts.
#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_dependencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DependencyRow {
    pub id: Uuid,
    pub blocker_task_id: Uuid,
    pub blocked_task_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Row for activity events, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = agent_activity)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRow {
    pub id: Uuid,
    pub task_id: Option<Uuid>,
    pub subtask_id: Option<Uuid>,
    pub agent_name: String,
    pub agent_role: Option<String>,
    pub session_id: Option<String>,
    pub hook_event: String,
    pub tool_name: Option<String>,
    pub tool_input_summary: Option<String>,
    pub tool_response_summary: Option<String>,
    pub duration_ms: Option<i32>,
    pub cost_usd: Option<f32>,
    pub num_turns: Option<i32>,
    pub event_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Row for experiment traces, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = mlflow_traces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TraceRow {
    pub id: Uuid,
    pub clone_id: String,
    pub experiment_name: String,
    pub run_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<i32>,
    pub status: String,
    pub total_tokens: Option<i32>,
    pub estimated_cost_usd: Option<f32>,
    pub model_id: Option<String>,
    pub synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
