//! Records agent hook callbacks into the activity log.
//!
//! Recording never fails the caller: store errors are logged and dropped so
//! that a database outage cannot interrupt agent work.

use crate::tracking::{
    domain::{AgentActivity, AgentRole, HookEvent, NewAgentActivity, TaskId},
    ports::ActivityRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

type InFlightKey = (Option<String>, String);

/// Upper bound on remembered tool starts; the oldest is evicted beyond it.
pub const MAX_IN_FLIGHT_TOOLS: usize = 256;

/// Identity stamped onto every event a recorder logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookContext {
    /// Task the agent is working on, if any.
    pub task_id: Option<TaskId>,
    /// Agent name as reported by the runtime.
    pub agent_name: String,
    /// Agent role, if known.
    pub agent_role: Option<AgentRole>,
}

impl HookContext {
    /// Creates a context for `agent_name` with no task or role.
    #[must_use]
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            task_id: None,
            agent_name: agent_name.into(),
            agent_role: None,
        }
    }

    /// Attributes events to `task_id`.
    #[must_use]
    pub const fn for_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Sets the agent role.
    #[must_use]
    pub fn with_role(mut self, role: AgentRole) -> Self {
        self.agent_role = Some(role);
        self
    }
}

/// Hook callbacks that append [`AgentActivity`] events.
pub struct ActivityRecorder<R, C>
where
    R: ActivityRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    context: HookContext,
    in_flight: Mutex<HashMap<InFlightKey, DateTime<Utc>>>,
}

impl<R, C> ActivityRecorder<R, C>
where
    R: ActivityRepository,
    C: Clock + Send + Sync,
{
    /// Creates a recorder for one agent.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, context: HookContext) -> Self {
        Self {
            repository,
            clock,
            context,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the identity stamped onto events.
    #[must_use]
    pub const fn context(&self) -> &HookContext {
        &self.context
    }

    /// Logs a tool invocation and remembers when it started.
    pub async fn pre_tool_use(&self, tool_name: &str, tool_input: &Value, session_id: Option<&str>) {
        let started = self.clock.utc();
        self.remember_start(session_id, tool_name, started);
        let request = self
            .event(HookEvent::PreToolUse, session_id)
            .with_tool(tool_name)
            .with_input_summary(tool_input.to_string())
            .at(started);
        self.record(request).await;
    }

    /// Logs a tool result, with its duration when the matching
    /// [`Self::pre_tool_use`] call was seen.
    pub async fn post_tool_use(
        &self,
        tool_name: &str,
        tool_input: &Value,
        tool_response: Option<&str>,
        session_id: Option<&str>,
    ) {
        let finished = self.clock.utc();
        let duration_ms = self
            .take_start(session_id, tool_name)
            .and_then(|started| {
                i32::try_from(finished.signed_duration_since(started).num_milliseconds()).ok()
            })
            .filter(|millis| *millis >= 0);
        let request = self
            .event(HookEvent::PostToolUse, session_id)
            .with_tool(tool_name)
            .with_input_summary(tool_input.to_string())
            .with_response_summary(tool_response.map(str::to_owned))
            .with_duration_ms(duration_ms)
            .at(finished);
        self.record(request).await;
    }

    /// Logs the end of a subagent run and forgets its unfinished tool calls.
    pub async fn subagent_stop(&self, session_id: Option<&str>, num_turns: Option<i32>) {
        self.forget_session(session_id);
        let request = self
            .event(HookEvent::SubagentStop, session_id)
            .with_num_turns(num_turns);
        self.record(request).await;
    }

    /// Logs the end of the agent run with its turn count and cost.
    pub async fn stop(&self, session_id: Option<&str>, num_turns: Option<i32>, cost_usd: Option<f32>) {
        self.forget_session(session_id);
        let request = self
            .event(HookEvent::Stop, session_id)
            .with_num_turns(num_turns)
            .with_cost(cost_usd);
        self.record(request).await;
    }

    fn event(&self, hook_event: HookEvent, session_id: Option<&str>) -> NewAgentActivity {
        NewAgentActivity::new(self.context.agent_name.clone(), hook_event)
            .for_task(self.context.task_id)
            .with_role(self.context.agent_role.clone())
            .with_session_id(session_id.map(str::to_owned))
    }

    fn remember_start(&self, session_id: Option<&str>, tool_name: &str, started: DateTime<Utc>) {
        let key = (session_id.map(str::to_owned), tool_name.to_owned());
        match self.in_flight.lock() {
            Ok(mut in_flight) => {
                if in_flight.len() >= MAX_IN_FLIGHT_TOOLS && !in_flight.contains_key(&key) {
                    let oldest = in_flight
                        .iter()
                        .min_by_key(|(_, at)| **at)
                        .map(|(oldest_key, _)| oldest_key.clone());
                    if let Some(evicted) = oldest {
                        in_flight.remove(&evicted);
                        debug!(tool = %evicted.1, "evicted unfinished tool start");
                    }
                }
                in_flight.insert(key, started);
            }
            Err(err) => warn!(error = %err, "tool start map poisoned; duration will be absent"),
        }
    }

    fn forget_session(&self, session_id: Option<&str>) {
        match self.in_flight.lock() {
            Ok(mut in_flight) => {
                in_flight.retain(|(session, _), _| session.as_deref() != session_id);
            }
            Err(err) => warn!(error = %err, "tool start map poisoned; nothing to forget"),
        }
    }

    fn take_start(&self, session_id: Option<&str>, tool_name: &str) -> Option<DateTime<Utc>> {
        let key = (session_id.map(str::to_owned), tool_name.to_owned());
        match self.in_flight.lock() {
            Ok(mut in_flight) => in_flight.remove(&key),
            Err(err) => {
                warn!(error = %err, "tool start map poisoned; duration will be absent");
                None
            }
        }
    }

    async fn record(&self, request: NewAgentActivity) {
        let activity = match AgentActivity::create(request, &*self.clock) {
            Ok(activity) => activity,
            Err(err) => {
                warn!(agent = %self.context.agent_name, error = %err, "rejected agent activity event");
                return;
            }
        };
        match self.repository.append(&activity).await {
            Ok(()) => debug!(
                activity_id = %activity.id(),
                hook_event = %activity.hook_event(),
                "agent activity recorded"
            ),
            Err(err) => warn!(
                agent = %self.context.agent_name,
                hook_event = %activity.hook_event(),
                error = %err,
                "failed to log agent activity event"
            ),
        }
    }
}
