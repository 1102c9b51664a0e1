//! Unit tests for tracking domain constructors and transitions.

use crate::tracking::domain::{
    AgentActivity, AgentRole, HookEvent, MlflowTrace, NewAgentActivity, NewMlflowTrace,
    NewSubtask, NewTask, SUMMARY_MAX_CHARS, Subtask, SubtaskType, TASK_SCHEMA_VERSION, Task,
    TaskDependency, TaskId, TaskPriority, TaskStatus, TrackingDomainError, truncate_summary,
};
use chrono::{Duration, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
fn create_task_applies_column_defaults(clock: DefaultClock) {
    let task = Task::create(NewTask::new("Review authentication module"), &clock)
        .expect("task should be valid");

    assert_eq!(task.title(), "Review authentication module");
    assert_eq!(task.status(), &TaskStatus::Pending);
    assert_eq!(task.priority(), &TaskPriority::Medium);
    assert_eq!(task.actual_cost_usd(), 0.0);
    assert_eq!(task.estimated_cost_usd(), 0.0);
    assert_eq!(task.schema_version(), TASK_SCHEMA_VERSION);
    assert!(task.started_at().is_none());
    assert!(task.completed_at().is_none());
    assert_eq!(task.created_at(), task.updated_at());
}

#[rstest]
#[case("")]
#[case("   ")]
fn create_task_rejects_blank_title(clock: DefaultClock, #[case] title: &str) {
    let result = Task::create(NewTask::new(title), &clock);

    assert_eq!(
        result.expect_err("blank title should fail"),
        TrackingDomainError::EmptyTitle { entity: "task" }
    );
}

#[rstest]
fn create_task_trims_title(clock: DefaultClock) {
    let task = Task::create(NewTask::new("  Write docs \n"), &clock).expect("task should be valid");

    assert_eq!(task.title(), "Write docs");
}

#[rstest]
fn create_task_rejects_overlong_title(clock: DefaultClock) {
    let result = Task::create(NewTask::new("x".repeat(201)), &clock);

    assert!(matches!(
        result,
        Err(TrackingDomainError::ValueTooLong {
            field: "title",
            max: 200,
            actual: 201,
        })
    ));
}

#[rstest]
fn create_task_rejects_overlong_custom_status(clock: DefaultClock) {
    let status = TaskStatus::from("waiting_for_external_review");
    let result = Task::create(NewTask::new("Task").with_status(status), &clock);

    assert!(matches!(
        result,
        Err(TrackingDomainError::ValueTooLong { field: "status", .. })
    ));
}

#[rstest]
#[case(-0.5)]
#[case(f32::NAN)]
#[case(f32::INFINITY)]
fn create_task_rejects_invalid_estimate(clock: DefaultClock, #[case] amount: f32) {
    let result = Task::create(NewTask::new("Task").with_estimated_cost(amount), &clock);

    assert!(matches!(
        result,
        Err(TrackingDomainError::InvalidCost {
            field: "estimated_cost_usd",
            ..
        })
    ));
}

#[rstest]
#[case(0)]
#[case(-3)]
fn create_task_rejects_non_positive_issue_number(clock: DefaultClock, #[case] number: i32) {
    let result = Task::create(NewTask::new("Task").with_github_issue(number, None), &clock);

    assert_eq!(
        result.expect_err("issue number should be rejected"),
        TrackingDomainError::InvalidIssueNumber(i64::from(number))
    );
}

#[rstest]
fn create_task_in_progress_stamps_start(clock: DefaultClock) {
    let task = Task::create(
        NewTask::new("Write integration tests for API").with_status(TaskStatus::InProgress),
        &clock,
    )
    .expect("task should be valid");

    assert_eq!(task.started_at(), Some(task.created_at()));
    assert!(task.completed_at().is_none());
}

#[rstest]
fn create_task_completed_stamps_both_timestamps(clock: DefaultClock) {
    let task = Task::create(
        NewTask::new("Review authentication module")
            .with_status(TaskStatus::Completed)
            .with_priority(TaskPriority::High)
            .with_assigned_agent(AgentRole::CodeReviewer),
        &clock,
    )
    .expect("task should be valid");

    assert!(task.started_at().is_some());
    assert!(task.completed_at().is_some());
    assert_eq!(task.assigned_agent(), Some(&AgentRole::CodeReviewer));
}

#[rstest]
fn set_status_keeps_first_start_timestamp(clock: DefaultClock) {
    let mut task = Task::create(NewTask::new("Task"), &clock).expect("task should be valid");

    task.set_status(TaskStatus::InProgress, &clock)
        .expect("status should be accepted");
    let first_start = task.started_at().expect("start should be stamped");
    task.set_status(TaskStatus::Blocked, &clock)
        .expect("status should be accepted");
    task.set_status(TaskStatus::InProgress, &clock)
        .expect("status should be accepted");

    assert_eq!(task.started_at(), Some(first_start));
    assert!(task.completed_at().is_none());

    task.set_status(TaskStatus::Completed, &clock)
        .expect("status should be accepted");
    assert_eq!(task.started_at(), Some(first_start));
    assert!(task.completed_at().is_some());
    assert!(task.status().is_terminal());
}

#[rstest]
fn accrue_cost_returns_running_total(clock: DefaultClock) {
    let mut task = Task::create(NewTask::new("Task"), &clock).expect("task should be valid");

    assert_eq!(task.accrue_cost(0.25, &clock), 0.25);
    assert_eq!(task.accrue_cost(0.5, &clock), 0.75);
    assert_eq!(task.actual_cost_usd(), 0.75);
}

#[rstest]
fn create_subtask_records_parent_and_type(clock: DefaultClock) {
    let parent = TaskId::new();
    let subtask = Subtask::create(
        NewSubtask::new(parent, SubtaskType::GitHook, "GitHub sync: issue #1")
            .with_status(TaskStatus::Completed)
            .with_github_issue(1, None),
        &clock,
    )
    .expect("subtask should be valid");

    assert_eq!(subtask.parent_task_id(), parent);
    assert_eq!(subtask.subtask_type(), &SubtaskType::GitHook);
    assert_eq!(subtask.status(), &TaskStatus::Completed);
    assert_eq!(subtask.github_issue_number(), Some(1));
    assert!(subtask.agent_activity_id().is_none());
}

#[rstest]
fn create_subtask_rejects_blank_title(clock: DefaultClock) {
    let result = Subtask::create(
        NewSubtask::new(TaskId::new(), SubtaskType::Validation, " "),
        &clock,
    );

    assert_eq!(
        result.expect_err("blank title should fail"),
        TrackingDomainError::EmptyTitle { entity: "subtask" }
    );
}

#[rstest]
fn finish_with_keeps_existing_summary_when_none_given(clock: DefaultClock) {
    let mut subtask = Subtask::create(
        NewSubtask::new(TaskId::new(), SubtaskType::AgentHook, "Run lints")
            .with_output_summary("started"),
        &clock,
    )
    .expect("subtask should be valid");

    subtask
        .finish_with(TaskStatus::Failed, None, &clock)
        .expect("status should be accepted");

    assert_eq!(subtask.status(), &TaskStatus::Failed);
    assert_eq!(subtask.output_summary(), Some("started"));
}

#[rstest]
fn dependency_rejects_self_edge(clock: DefaultClock) {
    let task_id = TaskId::new();

    assert_eq!(
        TaskDependency::new(task_id, task_id, &clock).expect_err("self edge should fail"),
        TrackingDomainError::SelfDependency(task_id)
    );
}

#[rstest]
fn dependency_touches_both_ends(clock: DefaultClock) {
    let blocker = TaskId::new();
    let blocked = TaskId::new();
    let edge = TaskDependency::new(blocker, blocked, &clock).expect("edge should be valid");

    assert!(edge.touches(blocker));
    assert!(edge.touches(blocked));
    assert!(!edge.touches(TaskId::new()));
}

#[rstest]
fn truncate_summary_leaves_short_text_alone() {
    assert_eq!(truncate_summary("short"), "short");
    let exact = "a".repeat(SUMMARY_MAX_CHARS);
    assert_eq!(truncate_summary(&exact), exact);
}

#[rstest]
fn truncate_summary_caps_long_text() {
    let long = "b".repeat(5000);
    let truncated = truncate_summary(&long);

    assert_eq!(truncated.chars().count(), SUMMARY_MAX_CHARS);
    assert!(truncated.ends_with("..."));
    assert!(truncated.starts_with(&"b".repeat(1997)));
}

#[rstest]
fn truncate_summary_counts_characters_not_bytes() {
    let long = "é".repeat(2001);
    let truncated = truncate_summary(&long);

    assert_eq!(truncated.chars().count(), SUMMARY_MAX_CHARS);
}

#[rstest]
fn activity_truncates_tool_payloads(clock: DefaultClock) {
    let event = AgentActivity::create(
        NewAgentActivity::new("code-reviewer", HookEvent::PostToolUse)
            .with_tool("Read")
            .with_input_summary("i".repeat(3000))
            .with_response_summary(Some("r".repeat(2500))),
        &clock,
    )
    .expect("event should be valid");

    assert_eq!(
        event.tool_input_summary().map(|text| text.chars().count()),
        Some(SUMMARY_MAX_CHARS)
    );
    assert_eq!(
        event.tool_response_summary().map(|text| text.chars().count()),
        Some(SUMMARY_MAX_CHARS)
    );
}

#[rstest]
fn activity_defaults_event_time_to_creation(clock: DefaultClock) {
    let event = AgentActivity::create(NewAgentActivity::new("team-lead", HookEvent::Stop), &clock)
        .expect("event should be valid");

    assert_eq!(event.event_at(), event.created_at());
    assert!(event.task_id().is_none());
}

#[rstest]
fn activity_rejects_blank_agent_name(clock: DefaultClock) {
    let result = AgentActivity::create(NewAgentActivity::new("", HookEvent::Stop), &clock);

    assert!(matches!(result, Err(TrackingDomainError::EmptyTitle { .. })));
}

#[rstest]
fn activity_rejects_negative_counts(clock: DefaultClock) {
    let result = AgentActivity::create(
        NewAgentActivity::new("test-runner", HookEvent::SubagentStop).with_num_turns(Some(-1)),
        &clock,
    );

    assert_eq!(
        result.expect_err("negative turns should fail"),
        TrackingDomainError::NegativeCount {
            field: "num_turns",
            value: -1,
        }
    );
}

fn trace_request() -> NewMlflowTrace {
    let start_time = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("timestamp should be valid");
    NewMlflowTrace {
        clone_id: "clone-a".to_owned(),
        experiment_name: "agents".to_owned(),
        run_id: "run-1".to_owned(),
        start_time,
        end_time: Some(start_time + Duration::milliseconds(1_500)),
        status: "FINISHED".to_owned(),
        total_tokens: Some(1200),
        estimated_cost_usd: Some(0.02),
        model_id: None,
    }
}

#[rstest]
fn trace_derives_duration(clock: DefaultClock) {
    let trace = MlflowTrace::create(trace_request(), &clock).expect("trace should be valid");

    assert_eq!(trace.duration_ms(), Some(1_500));
    assert_eq!(trace.run_id(), "run-1");
}

#[rstest]
fn trace_without_end_has_no_duration(clock: DefaultClock) {
    let mut request = trace_request();
    request.end_time = None;
    let trace = MlflowTrace::create(request, &clock).expect("trace should be valid");

    assert!(trace.duration_ms().is_none());
}

#[rstest]
fn trace_rejects_end_before_start(clock: DefaultClock) {
    let mut request = trace_request();
    request.end_time = Some(request.start_time - Duration::seconds(1));

    assert!(matches!(
        MlflowTrace::create(request, &clock),
        Err(TrackingDomainError::NegativeCount {
            field: "duration_ms",
            ..
        })
    ));
}
