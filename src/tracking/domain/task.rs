//! Task aggregate: the top-level unit of tracked work.

use super::{AgentRole, TaskId, TaskPriority, TaskStatus, TrackingDomainError, validate};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const STATUS_MAX_CHARS: usize = 20;
const PRIORITY_MAX_CHARS: usize = 20;
const AGENT_MAX_CHARS: usize = 30;
const SESSION_MAX_CHARS: usize = 100;
const PROJECT_ITEM_MAX_CHARS: usize = 50;

/// Schema version written with newly created tasks.
pub const TASK_SCHEMA_VERSION: i32 = 1;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewTask {
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    assigned_agent: Option<AgentRole>,
    session_id: Option<String>,
    estimated_cost_usd: f32,
    due_at: Option<DateTime<Utc>>,
    github_issue_number: Option<i32>,
    github_project_item_id: Option<String>,
}

impl NewTask {
    /// Creates a pending, medium-priority request with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the free-form description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Assigns the task to an agent role.
    #[must_use]
    pub fn with_assigned_agent(mut self, agent: AgentRole) -> Self {
        self.assigned_agent = Some(agent);
        self
    }

    /// Records the agent session working on the task.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the estimated cost in US dollars.
    #[must_use]
    pub const fn with_estimated_cost(mut self, amount_usd: f32) -> Self {
        self.estimated_cost_usd = amount_usd;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Links the task to an external issue and, optionally, a project item.
    #[must_use]
    pub fn with_github_issue(mut self, number: i32, project_item_id: Option<String>) -> Self {
        self.github_issue_number = Some(number);
        self.github_project_item_id = project_item_id;
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    assigned_agent: Option<AgentRole>,
    session_id: Option<String>,
    estimated_cost_usd: f32,
    actual_cost_usd: f32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    due_at: Option<DateTime<Utc>>,
    github_issue_number: Option<i32>,
    github_project_item_id: Option<String>,
    schema_version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTask {
    /// Persisted identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted assignee role.
    pub assigned_agent: Option<AgentRole>,
    /// Persisted agent session.
    pub session_id: Option<String>,
    /// Persisted estimate.
    pub estimated_cost_usd: f32,
    /// Persisted running cost.
    pub actual_cost_usd: f32,
    /// Persisted start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted due date.
    pub due_at: Option<DateTime<Utc>>,
    /// Persisted issue number.
    pub github_issue_number: Option<i32>,
    /// Persisted project item.
    pub github_project_item_id: Option<String>,
    /// Persisted row format version.
    pub schema_version: i32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task from a validated request.
    ///
    /// A task created directly in `in_progress` or `completed` gets its
    /// start or completion timestamp from the clock.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError`] when the title is empty, a value
    /// exceeds its column length, the estimate is negative, or the issue
    /// number is not positive.
    pub fn create(request: NewTask, clock: &impl Clock) -> Result<Self, TrackingDomainError> {
        let title = validate::title("task", &request.title)?;
        validate::bounded("status", request.status.as_str(), STATUS_MAX_CHARS)?;
        validate::bounded("priority", request.priority.as_str(), PRIORITY_MAX_CHARS)?;
        validate::bounded_opt(
            "assigned_agent",
            request.assigned_agent.as_ref().map(AgentRole::as_str),
            AGENT_MAX_CHARS,
        )?;
        validate::bounded_opt("session_id", request.session_id.as_deref(), SESSION_MAX_CHARS)?;
        validate::cost("estimated_cost_usd", request.estimated_cost_usd)?;
        validate::issue_number(request.github_issue_number)?;
        validate::bounded_opt(
            "github_project_item_id",
            request.github_project_item_id.as_deref(),
            PROJECT_ITEM_MAX_CHARS,
        )?;

        let timestamp = clock.utc();
        let mut task = Self {
            id: TaskId::new(),
            title,
            description: request.description,
            status: TaskStatus::Pending,
            priority: request.priority,
            assigned_agent: request.assigned_agent,
            session_id: request.session_id,
            estimated_cost_usd: request.estimated_cost_usd,
            actual_cost_usd: 0.0,
            started_at: None,
            completed_at: None,
            due_at: request.due_at,
            github_issue_number: request.github_issue_number,
            github_project_item_id: request.github_project_item_id,
            schema_version: TASK_SCHEMA_VERSION,
            created_at: timestamp,
            updated_at: timestamp,
        };
        task.apply_status(request.status, timestamp);
        Ok(task)
    }

    /// Reconstructs a task from persisted storage without validation.
    #[must_use]
    pub fn from_persisted(data: PersistedTask) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assigned_agent: data.assigned_agent,
            session_id: data.session_id,
            estimated_cost_usd: data.estimated_cost_usd,
            actual_cost_usd: data.actual_cost_usd,
            started_at: data.started_at,
            completed_at: data.completed_at,
            due_at: data.due_at,
            github_issue_number: data.github_issue_number,
            github_project_item_id: data.github_project_item_id,
            schema_version: data.schema_version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> &TaskPriority {
        &self.priority
    }

    /// Returns the assigned agent role, if any.
    #[must_use]
    pub const fn assigned_agent(&self) -> Option<&AgentRole> {
        self.assigned_agent.as_ref()
    }

    /// Returns the agent session identifier, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Returns the estimated cost in US dollars.
    #[must_use]
    pub const fn estimated_cost_usd(&self) -> f32 {
        self.estimated_cost_usd
    }

    /// Returns the accumulated cost in US dollars.
    #[must_use]
    pub const fn actual_cost_usd(&self) -> f32 {
        self.actual_cost_usd
    }

    /// Returns when work started, if it has.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when work completed, if it has.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }

    /// Returns the linked issue number, if any.
    #[must_use]
    pub const fn github_issue_number(&self) -> Option<i32> {
        self.github_issue_number
    }

    /// Returns the linked project item, if any.
    #[must_use]
    pub fn github_project_item_id(&self) -> Option<&str> {
        self.github_project_item_id.as_deref()
    }

    /// Returns the row format version.
    #[must_use]
    pub const fn schema_version(&self) -> i32 {
        self.schema_version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to `status`.
    ///
    /// Entering `in_progress` stamps `started_at` and entering `completed`
    /// stamps `completed_at`, each only when not already set.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::ValueTooLong`] when an unrecognised
    /// status does not fit the column.
    pub fn set_status(
        &mut self,
        status: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TrackingDomainError> {
        validate::bounded("status", status.as_str(), STATUS_MAX_CHARS)?;
        let timestamp = clock.utc();
        self.apply_status(status, timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Assigns the task to another agent role.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::ValueTooLong`] when the role does not
    /// fit the column.
    pub fn assign(&mut self, agent: AgentRole, clock: &impl Clock) -> Result<(), TrackingDomainError> {
        validate::bounded("assigned_agent", agent.as_str(), AGENT_MAX_CHARS)?;
        self.assigned_agent = Some(agent);
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Adds `amount_usd` to the accumulated cost and returns the new total.
    ///
    /// Callers are expected to have filtered out non-positive amounts.
    #[expect(
        clippy::float_arithmetic,
        reason = "costs are stored as REAL and summed in place"
    )]
    pub fn accrue_cost(&mut self, amount_usd: f32, clock: &impl Clock) -> f32 {
        self.actual_cost_usd += amount_usd;
        self.updated_at = clock.utc();
        self.actual_cost_usd
    }

    /// Copies the columns an update never overwrites from `stored`.
    pub(crate) const fn keep_stored_totals(&mut self, stored: &Self) {
        self.actual_cost_usd = stored.actual_cost_usd;
        self.created_at = stored.created_at;
    }

    fn apply_status(&mut self, status: TaskStatus, timestamp: DateTime<Utc>) {
        match status {
            TaskStatus::InProgress => {
                self.started_at.get_or_insert(timestamp);
            }
            TaskStatus::Completed => {
                self.started_at.get_or_insert(timestamp);
                self.completed_at.get_or_insert(timestamp);
            }
            _ => {}
        }
        self.status = status;
    }
}
