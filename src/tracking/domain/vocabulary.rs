//! Free-text vocabularies stored as short strings.
//!
//! The storage layer accepts any string for these columns, so each type keeps
//! an `Other` variant carrying the raw value instead of rejecting it. Matching
//! is exact: `"COMPLETED"` or `" pending"` stay `Other` and keep their bytes.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "String", from = "String")]
        pub enum $name {
            $($(#[$variant_meta])* $variant,)+
            /// Value outside the known vocabulary, kept verbatim.
            Other(String),
        }

        impl $name {
            /// Returns the canonical storage representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Other(value) => value,
                }
            }

            /// Returns `true` when the value is outside the known vocabulary.
            #[must_use]
            pub const fn is_other(&self) -> bool {
                matches!(self, Self::Other(_))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $($text => Self::$variant,)+
                    other => Self::Other(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_owned(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_vocabulary!(
    /// Lifecycle status shared by tasks and subtasks.
    TaskStatus {
        /// Work has not started.
        Pending => "pending",
        /// Work is underway.
        InProgress => "in_progress",
        /// Work waits on at least one blocker task.
        Blocked => "blocked",
        /// Work finished successfully.
        Completed => "completed",
        /// Work finished unsuccessfully.
        Failed => "failed",
        /// Work was abandoned.
        Cancelled => "cancelled",
    }
);

impl TaskStatus {
    /// Returns `true` for statuses after which no further work happens.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

string_vocabulary!(
    /// Scheduling priority of a task.
    TaskPriority {
        /// Drop everything.
        Critical => "critical",
        /// Next in line.
        High => "high",
        /// Normal queue position.
        Medium => "medium",
        /// When time allows.
        Low => "low",
    }
);

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

string_vocabulary!(
    /// Role of the agent a task is assigned to or an event came from.
    AgentRole {
        /// Coordinates the other agents.
        TeamLead => "team_lead",
        /// Reviews code changes.
        CodeReviewer => "code_reviewer",
        /// Runs test suites.
        TestRunner => "test_runner",
        /// Crawls web sources.
        WebCrawler => "web_crawler",
        /// Summarises research material.
        ResearchAnalyst => "research_analyst",
    }
);

string_vocabulary!(
    /// Kind of work a subtask represents.
    SubtaskType {
        /// Produced by a version-control hook such as an issue sync.
        GitHook => "git_hook",
        /// Produced by an agent hook.
        AgentHook => "agent_hook",
        /// A validation step.
        Validation => "validation",
        /// A notification step.
        Notification => "notification",
    }
);

string_vocabulary!(
    /// Agent lifecycle event an activity row records.
    HookEvent {
        /// Emitted before a tool runs.
        PreToolUse => "PreToolUse",
        /// Emitted after a tool returns.
        PostToolUse => "PostToolUse",
        /// Emitted when a sub-agent finishes.
        SubagentStop => "SubagentStop",
        /// Emitted when the top-level agent finishes.
        Stop => "Stop",
    }
);
