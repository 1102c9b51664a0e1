//! Gathers dashboard figures for one render.

use super::{
    domain::{DashboardSnapshot, RECENT_ACTIVITY_LIMIT},
    ports::DashboardQueries,
};
use crate::tracking::ports::StoreError;
use std::sync::Arc;
use thiserror::Error;

/// Failures while producing the dashboard page.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// One of the dashboard queries failed.
    #[error("dashboard query failed: {0}")]
    Query(#[from] StoreError),
    /// The page template failed to render.
    #[error("dashboard template failed: {0}")]
    Render(#[from] minijinja::Error),
}

/// Collects a [`DashboardSnapshot`] from the query port.
#[derive(Debug)]
pub struct DashboardService<Q>
where
    Q: DashboardQueries,
{
    queries: Arc<Q>,
}

impl<Q> Clone for DashboardService<Q>
where
    Q: DashboardQueries,
{
    fn clone(&self) -> Self {
        Self {
            queries: Arc::clone(&self.queries),
        }
    }
}

impl<Q> DashboardService<Q>
where
    Q: DashboardQueries,
{
    /// Creates the service.
    #[must_use]
    pub const fn new(queries: Arc<Q>) -> Self {
        Self { queries }
    }

    /// Runs the three dashboard queries concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Query`] with the first query failure.
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, DashboardError> {
        let (totals, status_counts, recent_activity) = tokio::try_join!(
            self.queries.task_totals(),
            self.queries.status_counts(),
            self.queries.recent_activity(RECENT_ACTIVITY_LIMIT),
        )?;
        Ok(DashboardSnapshot {
            totals,
            status_counts,
            recent_activity,
        })
    }
}
