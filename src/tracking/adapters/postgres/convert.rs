//! Conversions between domain values and Diesel rows.

use super::models::{
    ActivityRow, DependencyRow, SubtaskRow, SubtaskWriteRow, TaskRow, TaskWriteRow, TraceRow,
};
use crate::tracking::domain::{
    ActivityId, AgentActivity, AgentRole, DependencyId, HookEvent, MlflowTrace,
    PersistedAgentActivity, PersistedMlflowTrace, PersistedSubtask, PersistedTask, Subtask,
    SubtaskId, SubtaskType, Task, TaskDependency, TaskId, TaskPriority, TaskStatus, TraceId,
};

pub(super) fn task_to_row(task: &Task) -> TaskWriteRow {
    TaskWriteRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        assigned_agent: task.assigned_agent().map(|agent| agent.as_str().to_owned()),
        session_id: task.session_id().map(str::to_owned),
        estimated_cost_usd: task.estimated_cost_usd(),
        actual_cost_usd: task.actual_cost_usd(),
        started_at: task.started_at(),
        completed_at: task.completed_at(),
        due_at: task.due_at(),
        github_issue_number: task.github_issue_number(),
        github_project_item_id: task.github_project_item_id().map(str::to_owned),
        schema_version: task.schema_version(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

pub(super) fn row_to_task(row: TaskRow) -> Task {
    Task::from_persisted(PersistedTask {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        status: TaskStatus::from(row.status),
        priority: TaskPriority::from(row.priority),
        assigned_agent: row.assigned_agent.map(AgentRole::from),
        session_id: row.session_id,
        estimated_cost_usd: row.estimated_cost_usd,
        actual_cost_usd: row.actual_cost_usd,
        started_at: row.started_at,
        completed_at: row.completed_at,
        due_at: row.due_at,
        github_issue_number: row.github_issue_number,
        github_project_item_id: row.github_project_item_id,
        schema_version: row.schema_version,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub(super) fn subtask_to_row(subtask: &Subtask) -> SubtaskWriteRow {
    SubtaskWriteRow {
        id: subtask.id().into_inner(),
        parent_task_id: subtask.parent_task_id().into_inner(),
        subtask_type: subtask.subtask_type().as_str().to_owned(),
        title: subtask.title().to_owned(),
        status: subtask.status().as_str().to_owned(),
        output_summary: subtask.output_summary().map(str::to_owned),
        github_issue_number: subtask.github_issue_number(),
        github_project_item_id: subtask.github_project_item_id().map(str::to_owned),
        agent_activity_id: subtask.agent_activity_id().map(ActivityId::into_inner),
        schema_version: subtask.schema_version(),
        created_at: subtask.created_at(),
        updated_at: subtask.updated_at(),
    }
}

pub(super) fn row_to_subtask(row: SubtaskRow) -> Subtask {
    Subtask::from_persisted(PersistedSubtask {
        id: SubtaskId::from_uuid(row.id),
        parent_task_id: TaskId::from_uuid(row.parent_task_id),
        subtask_type: SubtaskType::from(row.subtask_type),
        title: row.title,
        status: TaskStatus::from(row.status),
        output_summary: row.output_summary,
        github_issue_number: row.github_issue_number,
        github_project_item_id: row.github_project_item_id,
        agent_activity_id: row.agent_activity_id.map(ActivityId::from_uuid),
        schema_version: row.schema_version,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub(super) const fn dependency_to_row(dependency: &TaskDependency) -> DependencyRow {
    DependencyRow {
        id: dependency.id().into_inner(),
        blocker_task_id: dependency.blocker_task_id().into_inner(),
        blocked_task_id: dependency.blocked_task_id().into_inner(),
        created_at: dependency.created_at(),
    }
}

pub(super) const fn row_to_dependency(row: DependencyRow) -> TaskDependency {
    TaskDependency::from_persisted(
        DependencyId::from_uuid(row.id),
        TaskId::from_uuid(row.blocker_task_id),
        TaskId::from_uuid(row.blocked_task_id),
        row.created_at,
    )
}

pub(super) fn activity_to_row(activity: &AgentActivity) -> ActivityRow {
    ActivityRow {
        id: activity.id().into_inner(),
        task_id: activity.task_id().map(TaskId::into_inner),
        subtask_id: activity.subtask_id().map(SubtaskId::into_inner),
        agent_name: activity.agent_name().to_owned(),
        agent_role: activity.agent_role().map(|role| role.as_str().to_owned()),
        session_id: activity.session_id().map(str::to_owned),
        hook_event: activity.hook_event().as_str().to_owned(),
        tool_name: activity.tool_name().map(str::to_owned),
        tool_input_summary: activity.tool_input_summary().map(str::to_owned),
        tool_response_summary: activity.tool_response_summary().map(str::to_owned),
        duration_ms: activity.duration_ms(),
        cost_usd: activity.cost_usd(),
        num_turns: activity.num_turns(),
        event_at: activity.event_at(),
        created_at: activity.created_at(),
    }
}

pub(super) fn row_to_activity(row: ActivityRow) -> AgentActivity {
    AgentActivity::from_persisted(PersistedAgentActivity {
        id: ActivityId::from_uuid(row.id),
        task_id: row.task_id.map(TaskId::from_uuid),
        subtask_id: row.subtask_id.map(SubtaskId::from_uuid),
        agent_name: row.agent_name,
        agent_role: row.agent_role.map(AgentRole::from),
        session_id: row.session_id,
        hook_event: HookEvent::from(row.hook_event),
        tool_name: row.tool_name,
        tool_input_summary: row.tool_input_summary,
        tool_response_summary: row.tool_response_summary,
        duration_ms: row.duration_ms,
        cost_usd: row.cost_usd,
        num_turns: row.num_turns,
        event_at: row.event_at,
        created_at: row.created_at,
    })
}

pub(super) fn trace_to_row(trace: &MlflowTrace) -> TraceRow {
    TraceRow {
        id: trace.id().into_inner(),
        clone_id: trace.clone_id().to_owned(),
        experiment_name: trace.experiment_name().to_owned(),
        run_id: trace.run_id().to_owned(),
        start_time: trace.start_time(),
        end_time: trace.end_time(),
        duration_ms: trace.duration_ms(),
        status: trace.status().to_owned(),
        total_tokens: trace.total_tokens(),
        estimated_cost_usd: trace.estimated_cost_usd(),
        model_id: trace.model_id().map(str::to_owned),
        synced_at: trace.synced_at(),
        created_at: trace.created_at(),
    }
}

pub(super) fn row_to_trace(row: TraceRow) -> MlflowTrace {
    MlflowTrace::from_persisted(PersistedMlflowTrace {
        id: TraceId::from_uuid(row.id),
        clone_id: row.clone_id,
        experiment_name: row.experiment_name,
        run_id: row.run_id,
        start_time: row.start_time,
        end_time: row.end_time,
        duration_ms: row.duration_ms,
        status: row.status,
        total_tokens: row.total_tokens,
        estimated_cost_usd: row.estimated_cost_usd,
        model_id: row.model_id,
        synced_at: row.synced_at,
        created_at: row.created_at,
    })
}
