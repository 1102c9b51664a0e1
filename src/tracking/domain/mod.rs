//! Domain model for tracked work: tasks, subtasks, dependency edges, agent
//! activity events and synced experiment traces.

mod activity;
mod dependency;
mod error;
mod ids;
mod subtask;
mod task;
mod trace;
mod validate;
mod vocabulary;

pub use activity::{AgentActivity, NewAgentActivity, PersistedAgentActivity};
pub use dependency::TaskDependency;
pub use error::TrackingDomainError;
pub use ids::{ActivityId, DependencyId, SubtaskId, TaskId, TraceId};
pub use subtask::{NewSubtask, PersistedSubtask, SUBTASK_SCHEMA_VERSION, Subtask};
pub use task::{NewTask, PersistedTask, TASK_SCHEMA_VERSION, Task};
pub use trace::{MlflowTrace, NewMlflowTrace, PersistedMlflowTrace};
pub use validate::{SUMMARY_MAX_CHARS, TITLE_MAX_CHARS, truncate_summary};
pub use vocabulary::{AgentRole, HookEvent, SubtaskType, TaskPriority, TaskStatus};
