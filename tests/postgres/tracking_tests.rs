//! Repository round trips and integrity rules against `PostgreSQL`.

use crate::postgres::helpers::{CleanupGuard, clock, setup_pool, test_runtime, unique_db_name};
use chrono::{Duration, TimeZone, Utc};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskboard::tracking::{
    adapters::postgres::PostgresTrackingRepository,
    domain::{
        AgentActivity, AgentRole, DependencyId, HookEvent, MlflowTrace, NewAgentActivity,
        NewMlflowTrace, NewSubtask, NewTask, Subtask, SubtaskType, Task, TaskDependency, TaskId,
        TaskPriority, TaskStatus,
    },
    ports::{
        ActivityRepository, Constraint, DependencyRepository, StoreError, SubtaskRepository,
        TaskFilter, TaskRepository, TraceRepository,
    },
};

fn task(clock: &DefaultClock, request: NewTask) -> Task {
    Task::create(request, clock).expect("valid test task")
}

#[rstest]
fn task_round_trip_preserves_fields(
    clock: DefaultClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db_name = unique_db_name("test_task_round_trip");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let repo = PostgresTrackingRepository::new(
        setup_pool(shared_test_cluster, &db_name).expect("database setup"),
    );
    let due = Utc
        .with_ymd_and_hms(2026, 12, 1, 17, 0, 0)
        .single()
        .expect("valid due date");
    let created = task(
        &clock,
        NewTask::new("Review authentication module")
            .with_description("JWT handling")
            .with_status(TaskStatus::from("on_hold"))
            .with_priority(TaskPriority::High)
            .with_assigned_agent(AgentRole::CodeReviewer)
            .with_session_id("session-9")
            .with_estimated_cost(0.5)
            .with_due_at(due)
            .with_github_issue(12, Some("PVTI_abc".to_owned())),
    );

    let rt = test_runtime();
    rt.block_on(TaskRepository::store(&repo, &created))
        .expect("store should succeed");
    let loaded = rt
        .block_on(TaskRepository::find_by_id(&repo, created.id()))
        .expect("lookup should succeed")
        .expect("task should exist");

    assert_eq!(loaded.id(), created.id());
    assert_eq!(loaded.title(), "Review authentication module");
    assert_eq!(loaded.description(), Some("JWT handling"));
    assert_eq!(loaded.status(), &TaskStatus::from("on_hold"));
    assert_eq!(loaded.priority(), &TaskPriority::High);
    assert_eq!(loaded.assigned_agent(), Some(&AgentRole::CodeReviewer));
    assert_eq!(loaded.session_id(), Some("session-9"));
    assert_eq!(loaded.estimated_cost_usd(), 0.5);
    assert_eq!(loaded.due_at(), Some(due));
    assert_eq!(loaded.github_issue_number(), Some(12));
    assert_eq!(loaded.github_project_item_id(), Some("PVTI_abc"));
}

#[rstest]
fn find_filters_orders_and_limits(
    clock: DefaultClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db_name = unique_db_name("test_task_find");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let repo = PostgresTrackingRepository::new(
        setup_pool(shared_test_cluster, &db_name).expect("database setup"),
    );
    let rt = test_runtime();
    let priorities = [
        TaskPriority::High,
        TaskPriority::Low,
        TaskPriority::High,
        TaskPriority::Low,
    ];
    for (index, priority) in priorities.into_iter().enumerate() {
        let stored = task(
            &clock,
            NewTask::new(format!("Task {index}")).with_priority(priority),
        );
        rt.block_on(TaskRepository::store(&repo, &stored))
            .expect("store should succeed");
    }

    let high = TaskFilter::default().with_priority(TaskPriority::High);
    let found = rt.block_on(repo.find(&high)).expect("find should succeed");
    let limited = rt
        .block_on(repo.find(&TaskFilter::default().with_limit(3)))
        .expect("find should succeed");
    let negative = rt
        .block_on(repo.find(&TaskFilter::default().with_limit(-1)))
        .expect("negative limit should clamp to zero");
    let total = rt
        .block_on(repo.count(&TaskFilter::default()))
        .expect("count should succeed");

    assert_eq!(found.len(), 2);
    assert!(found.is_sorted_by(|newer, older| newer.created_at() >= older.created_at()));
    assert_eq!(limited.len(), 3);
    assert!(negative.is_empty());
    assert_eq!(total, 4);
}

#[rstest]
fn update_and_add_cost(clock: DefaultClock, shared_test_cluster: &'static TestCluster) {
    let db_name = unique_db_name("test_task_update");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let repo = PostgresTrackingRepository::new(
        setup_pool(shared_test_cluster, &db_name).expect("database setup"),
    );
    let rt = test_runtime();
    let mut stored = task(&clock, NewTask::new("Write integration tests for API"));
    rt.block_on(TaskRepository::store(&repo, &stored))
        .expect("store should succeed");

    stored
        .set_status(TaskStatus::InProgress, &clock)
        .expect("status should be accepted");
    rt.block_on(TaskRepository::update(&repo, &stored))
        .expect("update should succeed");
    rt.block_on(repo.add_cost(stored.id(), 0.25))
        .expect("cost should add");
    let total = rt
        .block_on(repo.add_cost(stored.id(), 0.5))
        .expect("cost should add");
    let loaded = rt
        .block_on(TaskRepository::find_by_id(&repo, stored.id()))
        .expect("lookup should succeed")
        .expect("task should exist");

    assert_eq!(total, 0.75);
    assert_eq!(loaded.actual_cost_usd(), 0.75);
    assert_eq!(loaded.status(), &TaskStatus::InProgress);
    assert!(loaded.started_at().is_some());

    let missing = rt.block_on(repo.add_cost(TaskId::new(), 1.0));
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));
}

#[rstest]
fn update_from_stale_snapshot_keeps_added_cost(
    clock: DefaultClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db_name = unique_db_name("test_task_stale_update");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let repo = PostgresTrackingRepository::new(
        setup_pool(shared_test_cluster, &db_name).expect("database setup"),
    );
    let rt = test_runtime();
    let stored = task(&clock, NewTask::new("Review pull request"));
    rt.block_on(TaskRepository::store(&repo, &stored))
        .expect("store should succeed");
    let mut snapshot = rt
        .block_on(TaskRepository::find_by_id(&repo, stored.id()))
        .expect("lookup should succeed")
        .expect("task should exist");

    rt.block_on(repo.add_cost(stored.id(), 0.5))
        .expect("cost should add");
    snapshot
        .set_status(TaskStatus::Completed, &clock)
        .expect("status should be accepted");
    rt.block_on(TaskRepository::update(&repo, &snapshot))
        .expect("update should succeed");
    let loaded = rt
        .block_on(TaskRepository::find_by_id(&repo, stored.id()))
        .expect("lookup should succeed")
        .expect("task should exist");

    assert_eq!(loaded.actual_cost_usd(), 0.5);
    assert_eq!(loaded.status(), &TaskStatus::Completed);
    assert!(loaded.completed_at().is_some());
}

#[rstest]
fn dependency_constraints_are_named(
    clock: DefaultClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db_name = unique_db_name("test_dependencies");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let repo = PostgresTrackingRepository::new(
        setup_pool(shared_test_cluster, &db_name).expect("database setup"),
    );
    let rt = test_runtime();
    let first = task(&clock, NewTask::new("A"));
    let second = task(&clock, NewTask::new("B"));
    rt.block_on(TaskRepository::store(&repo, &first))
        .expect("store should succeed");
    rt.block_on(TaskRepository::store(&repo, &second))
        .expect("store should succeed");

    let edge = TaskDependency::new(first.id(), second.id(), &clock).expect("valid edge");
    rt.block_on(DependencyRepository::store(&repo, &edge))
        .expect("edge should store");
    let duplicate = TaskDependency::new(first.id(), second.id(), &clock).expect("valid edge");
    let self_edge =
        TaskDependency::from_persisted(DependencyId::new(), first.id(), first.id(), Utc::now());
    let dangling = TaskDependency::new(first.id(), TaskId::new(), &clock).expect("valid edge");

    let duplicate_err = rt
        .block_on(DependencyRepository::store(&repo, &duplicate))
        .expect_err("duplicate should fail");
    let self_err = rt
        .block_on(DependencyRepository::store(&repo, &self_edge))
        .expect_err("self edge should fail");
    let dangling_err = rt
        .block_on(DependencyRepository::store(&repo, &dangling))
        .expect_err("dangling edge should fail");

    assert_eq!(
        duplicate_err.constraint(),
        Some(&Constraint::DuplicateDependency)
    );
    assert_eq!(self_err.constraint(), Some(&Constraint::SelfDependency));
    assert_eq!(
        dangling_err.constraint(),
        Some(&Constraint::MissingReference(
            "task_dependencies_blocked_task_id_fkey".to_owned()
        ))
    );
    let blockers = rt
        .block_on(repo.blockers_of(second.id()))
        .expect("lookup should succeed");
    assert_eq!(blockers.len(), 1);
    assert!(rt
        .block_on(DependencyRepository::delete(&repo, first.id(), second.id()))
        .expect("delete should succeed"));
}

#[rstest]
fn deleting_task_cascades_and_detaches(
    clock: DefaultClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db_name = unique_db_name("test_cascade");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let repo = PostgresTrackingRepository::new(
        setup_pool(shared_test_cluster, &db_name).expect("database setup"),
    );
    let rt = test_runtime();
    let parent = task(&clock, NewTask::new("Parent"));
    let other = task(&clock, NewTask::new("Other"));
    rt.block_on(TaskRepository::store(&repo, &parent))
        .expect("store should succeed");
    rt.block_on(TaskRepository::store(&repo, &other))
        .expect("store should succeed");
    let subtask = Subtask::create(
        NewSubtask::new(parent.id(), SubtaskType::GitHook, "GitHub sync: issue #4"),
        &clock,
    )
    .expect("valid subtask");
    rt.block_on(SubtaskRepository::store(&repo, &subtask))
        .expect("subtask should store");
    let edge = TaskDependency::new(parent.id(), other.id(), &clock).expect("valid edge");
    rt.block_on(DependencyRepository::store(&repo, &edge))
        .expect("edge should store");
    let event = AgentActivity::create(
        NewAgentActivity::new("code-reviewer", HookEvent::PreToolUse)
            .for_task(Some(parent.id()))
            .for_subtask(subtask.id())
            .with_tool("Read"),
        &clock,
    )
    .expect("valid event");
    rt.block_on(repo.append(&event)).expect("event should append");

    let removed = rt
        .block_on(TaskRepository::delete(&repo, parent.id()))
        .expect("delete should succeed");

    assert!(removed);
    assert!(rt
        .block_on(SubtaskRepository::find_by_id(&repo, subtask.id()))
        .expect("lookup should succeed")
        .is_none());
    assert!(rt
        .block_on(repo.blocked_by(parent.id()))
        .expect("lookup should succeed")
        .is_empty());
    let kept = rt
        .block_on(ActivityRepository::find_by_id(&repo, event.id()))
        .expect("lookup should succeed")
        .expect("event should survive");
    assert!(kept.task_id().is_none());
    assert!(kept.subtask_id().is_none());
    assert_eq!(kept.tool_name(), Some("Read"));
}

#[rstest]
fn deleting_activity_detaches_subtask(
    clock: DefaultClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db_name = unique_db_name("test_activity_delete");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let repo = PostgresTrackingRepository::new(
        setup_pool(shared_test_cluster, &db_name).expect("database setup"),
    );
    let rt = test_runtime();
    let parent = task(&clock, NewTask::new("Parent"));
    rt.block_on(TaskRepository::store(&repo, &parent))
        .expect("store should succeed");
    let event = AgentActivity::create(
        NewAgentActivity::new("test-runner", HookEvent::SubagentStop)
            .for_task(Some(parent.id()))
            .with_num_turns(Some(4)),
        &clock,
    )
    .expect("valid event");
    rt.block_on(repo.append(&event)).expect("event should append");
    let subtask = Subtask::create(
        NewSubtask::new(parent.id(), SubtaskType::AgentHook, "Run suite")
            .with_agent_activity(event.id()),
        &clock,
    )
    .expect("valid subtask");
    rt.block_on(SubtaskRepository::store(&repo, &subtask))
        .expect("subtask should store");

    rt.block_on(ActivityRepository::delete(&repo, event.id()))
        .expect("delete should succeed");

    let reloaded = rt
        .block_on(SubtaskRepository::find_by_id(&repo, subtask.id()))
        .expect("lookup should succeed")
        .expect("subtask should survive");
    assert!(reloaded.agent_activity_id().is_none());
}

#[rstest]
fn traces_are_found_by_run_id(clock: DefaultClock, shared_test_cluster: &'static TestCluster) {
    let db_name = unique_db_name("test_traces");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let repo = PostgresTrackingRepository::new(
        setup_pool(shared_test_cluster, &db_name).expect("database setup"),
    );
    let rt = test_runtime();
    let start_time = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid start time");
    let trace = MlflowTrace::create(
        NewMlflowTrace {
            clone_id: "clone-a".to_owned(),
            experiment_name: "agents".to_owned(),
            run_id: "run-42".to_owned(),
            start_time,
            end_time: Some(start_time + Duration::seconds(2)),
            status: "FINISHED".to_owned(),
            total_tokens: Some(900),
            estimated_cost_usd: Some(0.01),
            model_id: Some("model-x".to_owned()),
        },
        &clock,
    )
    .expect("valid trace");

    rt.block_on(TraceRepository::store(&repo, &trace))
        .expect("trace should store");
    let found = rt
        .block_on(repo.find_by_run_id("run-42"))
        .expect("lookup should succeed");
    let none = rt
        .block_on(repo.find_by_run_id("run-0"))
        .expect("lookup should succeed");

    assert_eq!(found.len(), 1);
    assert_eq!(found.first().and_then(MlflowTrace::duration_ms), Some(2_000));
    assert!(none.is_empty());
}
