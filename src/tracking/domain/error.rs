//! Error types for tracking domain validation.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing tracking domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TrackingDomainError {
    /// A title is empty after trimming.
    #[error("{entity} title must not be empty")]
    EmptyTitle {
        /// Entity whose title was rejected.
        entity: &'static str,
    },

    /// A text value exceeds its column length.
    #[error("{field} exceeds {max} characters (got {actual})")]
    ValueTooLong {
        /// Column name.
        field: &'static str,
        /// Declared column length.
        max: usize,
        /// Length of the rejected value.
        actual: usize,
    },

    /// A monetary value is negative or not finite.
    #[error("{field} must be a finite, non-negative amount, got {value}")]
    InvalidCost {
        /// Column name.
        field: &'static str,
        /// Rejected amount.
        value: f32,
    },

    /// A count or duration is negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeCount {
        /// Column name.
        field: &'static str,
        /// Rejected value.
        value: i64,
    },

    /// An external issue number is zero or negative.
    #[error("invalid issue number {0}, expected a positive integer")]
    InvalidIssueNumber(i64),

    /// A dependency edge points from a task to itself.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),
}
