//! Experiment-tracking runs synced from an external tracker.

use super::{TraceId, TrackingDomainError, validate};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const CLONE_ID_MAX_CHARS: usize = 50;
const EXPERIMENT_MAX_CHARS: usize = 200;
const RUN_ID_MAX_CHARS: usize = 64;
const STATUS_MAX_CHARS: usize = 20;
const MODEL_ID_MAX_CHARS: usize = 100;

/// Request payload for recording a synced run.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMlflowTrace {
    /// Repository clone the run came from.
    pub clone_id: String,
    /// Experiment the run belongs to.
    pub experiment_name: String,
    /// Tracker run identifier.
    pub run_id: String,
    /// Run start.
    pub start_time: DateTime<Utc>,
    /// Run end, when finished.
    pub end_time: Option<DateTime<Utc>>,
    /// Run status as reported by the tracker.
    pub status: String,
    /// Total tokens consumed.
    pub total_tokens: Option<i32>,
    /// Estimated cost.
    pub estimated_cost_usd: Option<f32>,
    /// Model used by the run.
    pub model_id: Option<String>,
}

/// A synced experiment run. Independent of the task tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlflowTrace {
    id: TraceId,
    clone_id: String,
    experiment_name: String,
    run_id: String,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    duration_ms: Option<i32>,
    status: String,
    total_tokens: Option<i32>,
    estimated_cost_usd: Option<f32>,
    model_id: Option<String>,
    synced_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted trace.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedMlflowTrace {
    /// Persisted identifier.
    pub id: TraceId,
    /// Repository clone.
    pub clone_id: String,
    /// Experiment name.
    pub experiment_name: String,
    /// Tracker run identifier.
    pub run_id: String,
    /// Run start.
    pub start_time: DateTime<Utc>,
    /// Run end.
    pub end_time: Option<DateTime<Utc>>,
    /// Run duration.
    pub duration_ms: Option<i32>,
    /// Run status.
    pub status: String,
    /// Total tokens.
    pub total_tokens: Option<i32>,
    /// Estimated cost.
    pub estimated_cost_usd: Option<f32>,
    /// Model used.
    pub model_id: Option<String>,
    /// When the run was last synced.
    pub synced_at: DateTime<Utc>,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

impl MlflowTrace {
    /// Creates a trace record, deriving the duration from the run bounds.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError`] when a text value exceeds its column,
    /// the cost is invalid, the token count is negative, or the run ends
    /// before it starts.
    pub fn create(request: NewMlflowTrace, clock: &impl Clock) -> Result<Self, TrackingDomainError> {
        validate::bounded("clone_id", &request.clone_id, CLONE_ID_MAX_CHARS)?;
        validate::bounded("experiment_name", &request.experiment_name, EXPERIMENT_MAX_CHARS)?;
        validate::bounded("run_id", &request.run_id, RUN_ID_MAX_CHARS)?;
        validate::bounded("status", &request.status, STATUS_MAX_CHARS)?;
        validate::bounded_opt("model_id", request.model_id.as_deref(), MODEL_ID_MAX_CHARS)?;
        validate::count_opt("total_tokens", request.total_tokens)?;
        validate::cost_opt("estimated_cost_usd", request.estimated_cost_usd)?;

        let duration_ms = request
            .end_time
            .map(|end| end.signed_duration_since(request.start_time).num_milliseconds())
            .map(|millis| {
                i32::try_from(millis).map_err(|_| TrackingDomainError::NegativeCount {
                    field: "duration_ms",
                    value: millis,
                })
            })
            .transpose()?;
        validate::count_opt("duration_ms", duration_ms)?;

        let timestamp = clock.utc();
        Ok(Self {
            id: TraceId::new(),
            clone_id: request.clone_id,
            experiment_name: request.experiment_name,
            run_id: request.run_id,
            start_time: request.start_time,
            end_time: request.end_time,
            duration_ms,
            status: request.status,
            total_tokens: request.total_tokens,
            estimated_cost_usd: request.estimated_cost_usd,
            model_id: request.model_id,
            synced_at: timestamp,
            created_at: timestamp,
        })
    }

    /// Reconstructs a trace from storage without validation.
    #[must_use]
    pub fn from_persisted(data: PersistedMlflowTrace) -> Self {
        Self {
            id: data.id,
            clone_id: data.clone_id,
            experiment_name: data.experiment_name,
            run_id: data.run_id,
            start_time: data.start_time,
            end_time: data.end_time,
            duration_ms: data.duration_ms,
            status: data.status,
            total_tokens: data.total_tokens,
            estimated_cost_usd: data.estimated_cost_usd,
            model_id: data.model_id,
            synced_at: data.synced_at,
            created_at: data.created_at,
        }
    }

    /// Returns the trace identifier.
    #[must_use]
    pub const fn id(&self) -> TraceId {
        self.id
    }

    /// Returns the repository clone.
    #[must_use]
    pub fn clone_id(&self) -> &str {
        &self.clone_id
    }

    /// Returns the experiment name.
    #[must_use]
    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    /// Returns the tracker run identifier.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Returns the run start.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns the run end.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns the run duration.
    #[must_use]
    pub const fn duration_ms(&self) -> Option<i32> {
        self.duration_ms
    }

    /// Returns the run status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the total tokens.
    #[must_use]
    pub const fn total_tokens(&self) -> Option<i32> {
        self.total_tokens
    }

    /// Returns the estimated cost.
    #[must_use]
    pub const fn estimated_cost_usd(&self) -> Option<f32> {
        self.estimated_cost_usd
    }

    /// Returns the model used.
    #[must_use]
    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    /// Returns when the run was last synced.
    #[must_use]
    pub const fn synced_at(&self) -> DateTime<Utc> {
        self.synced_at
    }

    /// Returns when the row was written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
