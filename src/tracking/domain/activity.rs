//! Append-only log of agent hook events.

use super::{
    ActivityId, AgentRole, HookEvent, SubtaskId, TaskId, TrackingDomainError,
    validate::{self, truncate_summary},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const AGENT_NAME_MAX_CHARS: usize = 50;
const AGENT_ROLE_MAX_CHARS: usize = 30;
const SESSION_MAX_CHARS: usize = 100;
const HOOK_EVENT_MAX_CHARS: usize = 20;
const TOOL_NAME_MAX_CHARS: usize = 50;

/// Request payload for one activity event.
///
/// Summaries are truncated rather than rejected so that an oversized tool
/// payload never prevents the event from being logged.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAgentActivity {
    task_id: Option<TaskId>,
    subtask_id: Option<SubtaskId>,
    agent_name: String,
    agent_role: Option<AgentRole>,
    session_id: Option<String>,
    hook_event: HookEvent,
    tool_name: Option<String>,
    tool_input_summary: Option<String>,
    tool_response_summary: Option<String>,
    duration_ms: Option<i32>,
    cost_usd: Option<f32>,
    num_turns: Option<i32>,
    event_at: Option<DateTime<Utc>>,
}

impl NewAgentActivity {
    /// Creates an event request for `agent_name`.
    #[must_use]
    pub fn new(agent_name: impl Into<String>, hook_event: HookEvent) -> Self {
        Self {
            task_id: None,
            subtask_id: None,
            agent_name: agent_name.into(),
            agent_role: None,
            session_id: None,
            hook_event,
            tool_name: None,
            tool_input_summary: None,
            tool_response_summary: None,
            duration_ms: None,
            cost_usd: None,
            num_turns: None,
            event_at: None,
        }
    }

    /// Attributes the event to a task.
    #[must_use]
    pub const fn for_task(mut self, task_id: Option<TaskId>) -> Self {
        self.task_id = task_id;
        self
    }

    /// Attributes the event to a subtask.
    #[must_use]
    pub const fn for_subtask(mut self, subtask_id: SubtaskId) -> Self {
        self.subtask_id = Some(subtask_id);
        self
    }

    /// Sets the emitting agent's role.
    #[must_use]
    pub fn with_role(mut self, role: Option<AgentRole>) -> Self {
        self.agent_role = role;
        self
    }

    /// Sets the agent session.
    #[must_use]
    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Sets the tool involved in the event.
    #[must_use]
    pub fn with_tool(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    /// Records a summary of the tool input.
    #[must_use]
    pub fn with_input_summary(mut self, summary: impl Into<String>) -> Self {
        self.tool_input_summary = Some(summary.into());
        self
    }

    /// Records a summary of the tool response.
    #[must_use]
    pub fn with_response_summary(mut self, summary: Option<String>) -> Self {
        self.tool_response_summary = summary;
        self
    }

    /// Records how long the tool call took.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: Option<i32>) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Records the cost reported with the event.
    #[must_use]
    pub const fn with_cost(mut self, cost_usd: Option<f32>) -> Self {
        self.cost_usd = cost_usd;
        self
    }

    /// Records the number of agent turns.
    #[must_use]
    pub const fn with_num_turns(mut self, num_turns: Option<i32>) -> Self {
        self.num_turns = num_turns;
        self
    }

    /// Overrides the event timestamp, which otherwise comes from the clock.
    #[must_use]
    pub const fn at(mut self, event_at: DateTime<Utc>) -> Self {
        self.event_at = Some(event_at);
        self
    }
}

/// One immutable agent event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentActivity {
    id: ActivityId,
    task_id: Option<TaskId>,
    subtask_id: Option<SubtaskId>,
    agent_name: String,
    agent_role: Option<AgentRole>,
    session_id: Option<String>,
    hook_event: HookEvent,
    tool_name: Option<String>,
    tool_input_summary: Option<String>,
    tool_response_summary: Option<String>,
    duration_ms: Option<i32>,
    cost_usd: Option<f32>,
    num_turns: Option<i32>,
    event_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted activity event.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedAgentActivity {
    /// Persisted identifier.
    pub id: ActivityId,
    /// Related task, if it still exists.
    pub task_id: Option<TaskId>,
    /// Related subtask, if it still exists.
    pub subtask_id: Option<SubtaskId>,
    /// Emitting agent.
    pub agent_name: String,
    /// Emitting agent's role.
    pub agent_role: Option<AgentRole>,
    /// Agent session.
    pub session_id: Option<String>,
    /// Hook event kind.
    pub hook_event: HookEvent,
    /// Tool name.
    pub tool_name: Option<String>,
    /// Truncated tool input.
    pub tool_input_summary: Option<String>,
    /// Truncated tool response.
    pub tool_response_summary: Option<String>,
    /// Tool call duration.
    pub duration_ms: Option<i32>,
    /// Reported cost.
    pub cost_usd: Option<f32>,
    /// Reported turn count.
    pub num_turns: Option<i32>,
    /// When the event happened.
    pub event_at: DateTime<Utc>,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

impl AgentActivity {
    /// Creates an activity event from a request.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError`] when the agent name is empty, a text
    /// value exceeds its column, the cost is invalid, or a count is
    /// negative.
    pub fn create(
        request: NewAgentActivity,
        clock: &impl Clock,
    ) -> Result<Self, TrackingDomainError> {
        let agent_name = request.agent_name.trim().to_owned();
        if agent_name.is_empty() {
            return Err(TrackingDomainError::EmptyTitle {
                entity: "agent activity",
            });
        }
        validate::bounded("agent_name", &agent_name, AGENT_NAME_MAX_CHARS)?;
        validate::bounded_opt(
            "agent_role",
            request.agent_role.as_ref().map(AgentRole::as_str),
            AGENT_ROLE_MAX_CHARS,
        )?;
        validate::bounded_opt("session_id", request.session_id.as_deref(), SESSION_MAX_CHARS)?;
        validate::bounded("hook_event", request.hook_event.as_str(), HOOK_EVENT_MAX_CHARS)?;
        validate::bounded_opt("tool_name", request.tool_name.as_deref(), TOOL_NAME_MAX_CHARS)?;
        validate::count_opt("duration_ms", request.duration_ms)?;
        validate::cost_opt("cost_usd", request.cost_usd)?;
        validate::count_opt("num_turns", request.num_turns)?;

        let created_at = clock.utc();
        Ok(Self {
            id: ActivityId::new(),
            task_id: request.task_id,
            subtask_id: request.subtask_id,
            agent_name,
            agent_role: request.agent_role,
            session_id: request.session_id,
            hook_event: request.hook_event,
            tool_name: request.tool_name,
            tool_input_summary: request.tool_input_summary.as_deref().map(truncate_summary),
            tool_response_summary: request
                .tool_response_summary
                .as_deref()
                .map(truncate_summary),
            duration_ms: request.duration_ms,
            cost_usd: request.cost_usd,
            num_turns: request.num_turns,
            event_at: request.event_at.unwrap_or(created_at),
            created_at,
        })
    }

    /// Reconstructs an event from storage without validation.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentActivity) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            subtask_id: data.subtask_id,
            agent_name: data.agent_name,
            agent_role: data.agent_role,
            session_id: data.session_id,
            hook_event: data.hook_event,
            tool_name: data.tool_name,
            tool_input_summary: data.tool_input_summary,
            tool_response_summary: data.tool_response_summary,
            duration_ms: data.duration_ms,
            cost_usd: data.cost_usd,
            num_turns: data.num_turns,
            event_at: data.event_at,
            created_at: data.created_at,
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the related task, if it still exists.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the related subtask, if it still exists.
    #[must_use]
    pub const fn subtask_id(&self) -> Option<SubtaskId> {
        self.subtask_id
    }

    /// Returns the emitting agent's name.
    #[must_use]
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Returns the emitting agent's role.
    #[must_use]
    pub const fn agent_role(&self) -> Option<&AgentRole> {
        self.agent_role.as_ref()
    }

    /// Returns the agent session.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Returns the hook event kind.
    #[must_use]
    pub const fn hook_event(&self) -> &HookEvent {
        &self.hook_event
    }

    /// Returns the tool name.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    /// Returns the truncated tool input.
    #[must_use]
    pub fn tool_input_summary(&self) -> Option<&str> {
        self.tool_input_summary.as_deref()
    }

    /// Returns the truncated tool response.
    #[must_use]
    pub fn tool_response_summary(&self) -> Option<&str> {
        self.tool_response_summary.as_deref()
    }

    /// Returns the tool call duration.
    #[must_use]
    pub const fn duration_ms(&self) -> Option<i32> {
        self.duration_ms
    }

    /// Returns the reported cost.
    #[must_use]
    pub const fn cost_usd(&self) -> Option<f32> {
        self.cost_usd
    }

    /// Returns the reported turn count.
    #[must_use]
    pub const fn num_turns(&self) -> Option<i32> {
        self.num_turns
    }

    /// Returns when the event happened.
    #[must_use]
    pub const fn event_at(&self) -> DateTime<Utc> {
        self.event_at
    }

    /// Returns when the row was written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Clears the task reference after that task is removed.
    pub const fn detach_task(&mut self) {
        self.task_id = None;
    }

    /// Clears the subtask reference after that subtask is removed.
    pub const fn detach_subtask(&mut self) {
        self.subtask_id = None;
    }
}
