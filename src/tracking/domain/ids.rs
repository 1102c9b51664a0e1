//! Identifier newtypes for tracked records.
//!
//! Each table keys its rows by a UUID. Wrapping those UUIDs keeps a subtask
//! identifier from being passed where a task identifier is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a task row.
    TaskId
);

uuid_identifier!(
    /// Unique identifier for a subtask row.
    SubtaskId
);

uuid_identifier!(
    /// Unique identifier for a task dependency edge.
    DependencyId
);

uuid_identifier!(
    /// Unique identifier for an agent activity log entry.
    ActivityId
);

uuid_identifier!(
    /// Unique identifier for a synced experiment trace.
    TraceId
);
