//! Diesel schema for tracked-work persistence.

diesel::table! {
    /// Top-level units of tracked work.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Short title.
        #[max_length = 200]
        title -> Varchar,
        /// Free-form description.
        description -> Nullable<Text>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Assigned agent role.
        #[max_length = 30]
        assigned_agent -> Nullable<Varchar>,
        /// Agent session working on the task.
        #[max_length = 100]
        session_id -> Nullable<Varchar>,
        /// Estimated cost in US dollars.
        estimated_cost_usd -> Float4,
        /// Accumulated cost in US dollars.
        actual_cost_usd -> Float4,
        /// Start of work.
        started_at -> Nullable<Timestamptz>,
        /// Completion of work.
        completed_at -> Nullable<Timestamptz>,
        /// Due date.
        due_at -> Nullable<Timestamptz>,
        /// Linked issue number.
        github_issue_number -> Nullable<Int4>,
        /// Linked project item.
        #[max_length = 50]
        github_project_item_id -> Nullable<Varchar>,
        /// Row format version.
        schema_version -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Decomposed steps of a task.
    subtasks (id) {
        /// Subtask identifier.
        id -> Uuid,
        /// Owning task.
        parent_task_id -> Uuid,
        /// Subtask kind.
        #[max_length = 20]
        subtask_type -> Varchar,
        /// Short title.
        #[max_length = 200]
        title -> Varchar,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Output summary.
        output_summary -> Nullable<Text>,
        /// Linked issue number.
        github_issue_number -> Nullable<Int4>,
        /// Linked project item.
        #[max_length = 50]
        github_project_item_id -> Nullable<Varchar>,
        /// Producing activity event.
        agent_activity_id -> Nullable<Uuid>,
        /// Row format version.
        schema_version -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed "blocks" edges between tasks.
    task_dependencies (id) {
        /// Edge identifier.
        id -> Uuid,
        /// Task that blocks.
        blocker_task_id -> Uuid,
        /// Task that is blocked.
        blocked_task_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only agent hook events.
    agent_activity (id) {
        /// Event identifier.
        id -> Uuid,
        /// Related task.
        task_id -> Nullable<Uuid>,
        /// Related subtask.
        subtask_id -> Nullable<Uuid>,
        /// Emitting agent.
        #[max_length = 50]
        agent_name -> Varchar,
        /// Emitting agent's role.
        #[max_length = 30]
        agent_role -> Nullable<Varchar>,
        /// Agent session.
        #[max_length = 100]
        session_id -> Nullable<Varchar>,
        /// Hook event kind.
        #[max_length = 20]
        hook_event -> Varchar,
        /// Tool name.
        #[max_length = 50]
        tool_name -> Nullable<Varchar>,
        /// Truncated tool input.
        #[max_length = 2000]
        tool_input_summary -> Nullable<Varchar>,
        /// Truncated tool response.
        #[max_length = 2000]
        tool_response_summary -> Nullable<Varchar>,
        /// Tool call duration.
        duration_ms -> Nullable<Int4>,
        /// Reported cost.
        cost_usd -> Nullable<Float4>,
        /// Reported turn count.
        num_turns -> Nullable<Int4>,
        /// When the event happened.
        event_at -> Timestamptz,
        /// When the row was written.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Experiment runs synced from an external tracker.
    mlflow_traces (id) {
        /// Trace identifier.
        id -> Uuid,
        /// Repository clone.
        #[max_length = 50]
        clone_id -> Varchar,
        /// Experiment name.
        #[max_length = 200]
        experiment_name -> Varchar,
        /// Tracker run identifier.
        #[max_length = 64]
        run_id -> Varchar,
        /// Run start.
        start_time -> Timestamptz,
        /// Run end.
        end_time -> Nullable<Timestamptz>,
        /// Run duration.
        duration_ms -> Nullable<Int4>,
        /// Run status.
        #[max_length = 20]
        status -> Varchar,
        /// Total tokens.
        total_tokens -> Nullable<Int4>,
        /// Estimated cost.
        estimated_cost_usd -> Nullable<Float4>,
        /// Model used.
        #[max_length = 100]
        model_id -> Nullable<Varchar>,
        /// Last sync.
        synced_at -> Timestamptz,
        /// When the row was written.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(subtasks -> tasks (parent_task_id));
diesel::joinable!(agent_activity -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(
    tasks,
    subtasks,
    task_dependencies,
    agent_activity,
    mlflow_traces,
);
