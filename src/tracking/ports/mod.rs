//! Port contracts for tracked-work persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by tracking services.

pub mod error;
pub mod filter;
pub mod repository;

pub use error::{Constraint, StoreError, StoreResult};
pub use filter::{DEFAULT_TASK_LIMIT, TaskFilter};
pub use repository::{
    ActivityRepository, DependencyRepository, SubtaskRepository, TaskRepository,
    TraceRepository, TrackingStore,
};
