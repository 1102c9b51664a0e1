//! Subtasks decompose a task into smaller tracked steps.

use super::{
    ActivityId, SubtaskId, SubtaskType, TaskId, TaskStatus, TrackingDomainError, validate,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const TYPE_MAX_CHARS: usize = 20;
const STATUS_MAX_CHARS: usize = 20;
const PROJECT_ITEM_MAX_CHARS: usize = 50;

/// Schema version written with newly created subtasks.
pub const SUBTASK_SCHEMA_VERSION: i32 = 1;

/// Request payload for creating a subtask under an existing task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubtask {
    parent_task_id: TaskId,
    subtask_type: SubtaskType,
    title: String,
    status: TaskStatus,
    output_summary: Option<String>,
    github_issue_number: Option<i32>,
    github_project_item_id: Option<String>,
    agent_activity_id: Option<ActivityId>,
}

impl NewSubtask {
    /// Creates a pending subtask request.
    #[must_use]
    pub fn new(parent_task_id: TaskId, subtask_type: SubtaskType, title: impl Into<String>) -> Self {
        Self {
            parent_task_id,
            subtask_type,
            title: title.into(),
            status: TaskStatus::Pending,
            output_summary: None,
            github_issue_number: None,
            github_project_item_id: None,
            agent_activity_id: None,
        }
    }

    /// Sets the initial status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Records a summary of the subtask's output.
    #[must_use]
    pub fn with_output_summary(mut self, summary: impl Into<String>) -> Self {
        self.output_summary = Some(summary.into());
        self
    }

    /// Links the subtask to an external issue and, optionally, a project item.
    #[must_use]
    pub fn with_github_issue(mut self, number: i32, project_item_id: Option<String>) -> Self {
        self.github_issue_number = Some(number);
        self.github_project_item_id = project_item_id;
        self
    }

    /// Links the subtask to the activity event that produced it.
    #[must_use]
    pub const fn with_agent_activity(mut self, activity_id: ActivityId) -> Self {
        self.agent_activity_id = Some(activity_id);
        self
    }
}

/// A step of work belonging to exactly one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    id: SubtaskId,
    parent_task_id: TaskId,
    subtask_type: SubtaskType,
    title: String,
    status: TaskStatus,
    output_summary: Option<String>,
    github_issue_number: Option<i32>,
    github_project_item_id: Option<String>,
    agent_activity_id: Option<ActivityId>,
    schema_version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted subtask.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSubtask {
    /// Persisted identifier.
    pub id: SubtaskId,
    /// Owning task.
    pub parent_task_id: TaskId,
    /// Persisted subtask kind.
    pub subtask_type: SubtaskType,
    /// Persisted title.
    pub title: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted output summary.
    pub output_summary: Option<String>,
    /// Persisted issue number.
    pub github_issue_number: Option<i32>,
    /// Persisted project item.
    pub github_project_item_id: Option<String>,
    /// Producing activity event, if still present.
    pub agent_activity_id: Option<ActivityId>,
    /// Persisted row format version.
    pub schema_version: i32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Subtask {
    /// Creates a subtask from a validated request.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError`] when the title is empty or too long,
    /// a vocabulary value does not fit its column, or the issue number is
    /// not positive.
    pub fn create(request: NewSubtask, clock: &impl Clock) -> Result<Self, TrackingDomainError> {
        let title = validate::title("subtask", &request.title)?;
        validate::bounded("subtask_type", request.subtask_type.as_str(), TYPE_MAX_CHARS)?;
        validate::bounded("status", request.status.as_str(), STATUS_MAX_CHARS)?;
        validate::issue_number(request.github_issue_number)?;
        validate::bounded_opt(
            "github_project_item_id",
            request.github_project_item_id.as_deref(),
            PROJECT_ITEM_MAX_CHARS,
        )?;

        let timestamp = clock.utc();
        Ok(Self {
            id: SubtaskId::new(),
            parent_task_id: request.parent_task_id,
            subtask_type: request.subtask_type,
            title,
            status: request.status,
            output_summary: request.output_summary,
            github_issue_number: request.github_issue_number,
            github_project_item_id: request.github_project_item_id,
            agent_activity_id: request.agent_activity_id,
            schema_version: SUBTASK_SCHEMA_VERSION,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a subtask from persisted storage without validation.
    #[must_use]
    pub fn from_persisted(data: PersistedSubtask) -> Self {
        Self {
            id: data.id,
            parent_task_id: data.parent_task_id,
            subtask_type: data.subtask_type,
            title: data.title,
            status: data.status,
            output_summary: data.output_summary,
            github_issue_number: data.github_issue_number,
            github_project_item_id: data.github_project_item_id,
            agent_activity_id: data.agent_activity_id,
            schema_version: data.schema_version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> SubtaskId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn parent_task_id(&self) -> TaskId {
        self.parent_task_id
    }

    /// Returns the subtask kind.
    #[must_use]
    pub const fn subtask_type(&self) -> &SubtaskType {
        &self.subtask_type
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns the output summary, if any.
    #[must_use]
    pub fn output_summary(&self) -> Option<&str> {
        self.output_summary.as_deref()
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

    /// Returns the producing activity event, if it still exists.
    #[must_use]
    pub const fn agent_activity_id(&self) -> Option<ActivityId> {
        self.agent_activity_id
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

    /// Moves the subtask to `status`, optionally recording its output.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::ValueTooLong`] when the status does
    /// not fit the column.
    pub fn finish_with(
        &mut self,
        status: TaskStatus,
        output_summary: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TrackingDomainError> {
        validate::bounded("status", status.as_str(), STATUS_MAX_CHARS)?;
        self.status = status;
        if output_summary.is_some() {
            self.output_summary = output_summary;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Clears the activity back-reference after that event is removed.
    pub const fn detach_activity(&mut self) {
        self.agent_activity_id = None;
    }
}
