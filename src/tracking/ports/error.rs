//! Storage error taxonomy shared by every tracking repository.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tracking repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Integrity rule that rejected a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// A dependency edge named the same task at both ends.
    SelfDependency,
    /// The `(blocker, blocked)` pair already exists.
    DuplicateDependency,
    /// A foreign key pointed at a row that does not exist.
    MissingReference(String),
    /// Any other named constraint, such as a primary key clash.
    Other(String),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfDependency => f.write_str("task cannot depend on itself"),
            Self::DuplicateDependency => f.write_str("dependency already exists"),
            Self::MissingReference(name) => write!(f, "missing referenced row ({name})"),
            Self::Other(name) => write!(f, "constraint {name}"),
        }
    }
}

/// Errors returned by tracking repository implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached or the connection dropped.
    #[error("store connection unavailable: {0}")]
    ConnectionUnavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// A write violated an integrity constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(Constraint),

    /// The addressed row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Table or entity kind.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Any other persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a connectivity failure.
    #[must_use]
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ConnectionUnavailable(Arc::new(err))
    }

    /// Builds a not-found error for `entity`.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the violated constraint, if this is a constraint failure.
    #[must_use]
    pub const fn constraint(&self) -> Option<&Constraint> {
        match self {
            Self::ConstraintViolation(constraint) => Some(constraint),
            _ => None,
        }
    }
}
