//! HTTP surface: the dashboard page and a health probe.

use super::{
    ports::DashboardQueries,
    render::DashboardRenderer,
    services::{DashboardError, DashboardService},
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const ERROR_PAGE: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>Taskboard</title></head><body><h2>Dashboard unavailable</h2>\
<p>The dashboard could not be loaded. Check the server logs.</p></body></html>";

/// Shared state for dashboard handlers.
pub struct AppState<Q>
where
    Q: DashboardQueries,
{
    service: DashboardService<Q>,
    renderer: Arc<DashboardRenderer>,
}

impl<Q> Clone for AppState<Q>
where
    Q: DashboardQueries,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            renderer: Arc::clone(&self.renderer),
        }
    }
}

impl<Q> AppState<Q>
where
    Q: DashboardQueries,
{
    /// Bundles the query service and page renderer.
    #[must_use]
    pub const fn new(service: DashboardService<Q>, renderer: Arc<DashboardRenderer>) -> Self {
        Self { service, renderer }
    }
}

/// Health probe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        error!(error = %self, "dashboard render failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Html(ERROR_PAGE)).into_response()
    }
}

/// Renders the dashboard page.
///
/// # Errors
///
/// Returns [`DashboardError`] when a query or the template fails; the error
/// is logged and answered with a 500 page.
pub async fn dashboard_page<Q>(
    State(state): State<AppState<Q>>,
) -> Result<Html<String>, DashboardError>
where
    Q: DashboardQueries + 'static,
{
    let snapshot = state.service.snapshot().await?;
    let page = state.renderer.render(&snapshot)?;
    Ok(Html(page))
}

/// Reports that the process is serving requests.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the dashboard router.
#[must_use]
pub fn router<Q>(state: AppState<Q>) -> Router
where
    Q: DashboardQueries + 'static,
{
    Router::new()
        .route("/", get(dashboard_page::<Q>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the dashboard on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an I/O error when the listener fails.
pub async fn serve<Q, S>(listener: TcpListener, state: AppState<Q>, shutdown: S) -> std::io::Result<()>
where
    Q: DashboardQueries + 'static,
    S: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr()?;
    info!(%address, "dashboard listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
