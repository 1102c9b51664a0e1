//! Sample data for local dashboards.

use super::TrackingServiceResult;
use crate::tracking::{
    domain::{
        AgentActivity, AgentRole, HookEvent, NewAgentActivity, NewSubtask, PersistedTask,
        Subtask, SubtaskType, TASK_SCHEMA_VERSION, Task, TaskId, TaskPriority, TaskStatus,
    },
    ports::{SubtaskRepository, TaskRepository, TrackingStore},
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::fmt;
use tracing::info;

/// Row counts written by [`seed_sample_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Tasks inserted.
    pub tasks: usize,
    /// Subtasks inserted.
    pub subtasks: usize,
    /// Activity events inserted.
    pub activity_events: usize,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seeded {} tasks, {} subtask, {} activity events",
            self.tasks, self.subtasks, self.activity_events
        )
    }
}

struct SampleTask {
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: TaskPriority,
    agent: AgentRole,
    estimated_cost_usd: f32,
    actual_cost_usd: f32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

fn sample_tasks() -> [SampleTask; 3] {
    [
        SampleTask {
            title: "Review authentication module",
            description: "Full code review of auth.py including JWT handling",
            status: TaskStatus::Completed,
            priority: TaskPriority::High,
            agent: AgentRole::CodeReviewer,
            estimated_cost_usd: 0.50,
            actual_cost_usd: 0.42,
            started_at: Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).single(),
            completed_at: Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).single(),
        },
        SampleTask {
            title: "Write integration tests for API",
            description: "Cover all REST endpoints with pytest",
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            agent: AgentRole::TestRunner,
            estimated_cost_usd: 1.00,
            actual_cost_usd: 0.15,
            started_at: Utc.with_ymd_and_hms(2025, 1, 15, 11, 0, 0).single(),
            completed_at: None,
        },
        SampleTask {
            title: "Research caching strategies",
            description: "Evaluate Redis vs in-memory caching for crawl results",
            status: TaskStatus::Pending,
            priority: TaskPriority::Low,
            agent: AgentRole::ResearchAnalyst,
            estimated_cost_usd: 0.30,
            actual_cost_usd: 0.0,
            started_at: None,
            completed_at: None,
        },
    ]
}

fn build_task(sample: SampleTask, timestamp: DateTime<Utc>) -> Task {
    Task::from_persisted(PersistedTask {
        id: TaskId::new(),
        title: sample.title.to_owned(),
        description: Some(sample.description.to_owned()),
        status: sample.status,
        priority: sample.priority,
        assigned_agent: Some(sample.agent),
        session_id: None,
        estimated_cost_usd: sample.estimated_cost_usd,
        actual_cost_usd: sample.actual_cost_usd,
        started_at: sample.started_at,
        completed_at: sample.completed_at,
        due_at: None,
        github_issue_number: None,
        github_project_item_id: None,
        schema_version: TASK_SCHEMA_VERSION,
        created_at: timestamp,
        updated_at: timestamp,
    })
}

fn sample_activity(task_id: TaskId, base: DateTime<Utc>) -> [NewAgentActivity; 3] {
    let reviewer = |event| {
        NewAgentActivity::new("code-reviewer", event)
            .for_task(Some(task_id))
            .with_role(Some(AgentRole::CodeReviewer))
    };
    [
        reviewer(HookEvent::PreToolUse)
            .with_tool("Read")
            .with_input_summary(r#"{"file_path": "src/auth.py"}"#)
            .at(base),
        reviewer(HookEvent::PostToolUse)
            .with_tool("Read")
            .with_duration_ms(Some(150))
            .at(base + TimeDelta::milliseconds(150)),
        reviewer(HookEvent::Stop)
            .with_num_turns(Some(8))
            .with_cost(Some(0.42))
            .at(base + TimeDelta::seconds(1)),
    ]
}

/// Inserts three sample tasks, one subtask and three activity events.
///
/// The first task is a completed code review which owns the subtask and
/// all activity events.
///
/// # Errors
///
/// Returns a domain or store error when any insert fails. Rows written
/// before the failure are kept.
pub async fn seed_sample_data<R, C>(repository: &R, clock: &C) -> TrackingServiceResult<SeedSummary>
where
    R: TrackingStore,
    C: Clock + Send + Sync,
{
    let timestamp = clock.utc();
    let mut task_ids = Vec::new();
    for sample in sample_tasks() {
        let task = build_task(sample, timestamp);
        TaskRepository::store(repository, &task).await?;
        task_ids.push(task.id());
    }

    let Some(&review_task) = task_ids.first() else {
        return Ok(SeedSummary {
            tasks: 0,
            subtasks: 0,
            activity_events: 0,
        });
    };

    let subtask = Subtask::create(
        NewSubtask::new(review_task, SubtaskType::GitHook, "GitHub sync: issue #1")
            .with_status(TaskStatus::Completed)
            .with_output_summary("Synced to jadecli/team-agents-sdk#1")
            .with_github_issue(1, None),
        clock,
    )?;
    SubtaskRepository::store(repository, &subtask).await?;

    let events = sample_activity(review_task, timestamp);
    let activity_events = events.len();
    for request in events {
        let activity = AgentActivity::create(request, clock)?;
        repository.append(&activity).await?;
    }

    let summary = SeedSummary {
        tasks: task_ids.len(),
        subtasks: 1,
        activity_events,
    };
    info!(%summary, "sample data inserted");
    Ok(summary)
}
