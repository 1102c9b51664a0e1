//! HTML rendering of a [`DashboardSnapshot`].

use super::domain::{DashboardSnapshot, badge_class};
use minijinja::Environment;
use serde::Serialize;

const TEMPLATE_NAME: &str = "dashboard.html";
const TEMPLATE_SOURCE: &str = include_str!("templates/dashboard.html");

/// Shown in place of an absent tool name.
pub const MISSING_TOOL_PLACEHOLDER: &str = "—";

/// Layout of rendered event times (UTC).
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct StatusView<'a> {
    status: &'a str,
    count: i64,
    class: &'static str,
}

#[derive(Serialize)]
struct ActivityView<'a> {
    agent_name: &'a str,
    hook_event: &'a str,
    tool: &'a str,
    time: String,
}

#[derive(Serialize)]
struct PageView<'a> {
    total_tasks: i64,
    total_cost: String,
    statuses: Vec<StatusView<'a>>,
    activity: Vec<ActivityView<'a>>,
}

impl<'a> PageView<'a> {
    fn from_snapshot(snapshot: &'a DashboardSnapshot) -> Self {
        Self {
            total_tasks: snapshot.totals.total_tasks,
            total_cost: format!("{:.2}", snapshot.totals.total_cost_usd),
            statuses: snapshot
                .status_counts
                .iter()
                .map(|entry| StatusView {
                    status: entry.status.as_str(),
                    count: entry.count,
                    class: badge_class(&entry.status),
                })
                .collect(),
            activity: snapshot
                .recent_activity
                .iter()
                .map(|entry| ActivityView {
                    agent_name: &entry.agent_name,
                    hook_event: entry.hook_event.as_str(),
                    tool: entry.tool_name.as_deref().unwrap_or(MISSING_TOOL_PLACEHOLDER),
                    time: entry.event_at.format(EVENT_TIME_FORMAT).to_string(),
                })
                .collect(),
        }
    }
}

/// Renders the dashboard page with an auto-escaping template environment.
#[derive(Debug)]
pub struct DashboardRenderer {
    environment: Environment<'static>,
}

impl DashboardRenderer {
    /// Loads the embedded page template.
    ///
    /// # Errors
    ///
    /// Returns [`minijinja::Error`] when the template fails to parse.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut environment = Environment::new();
        environment.add_template(TEMPLATE_NAME, TEMPLATE_SOURCE)?;
        Ok(Self { environment })
    }

    /// Renders `snapshot` as a complete HTML document.
    ///
    /// # Errors
    ///
    /// Returns [`minijinja::Error`] when rendering fails.
    pub fn render(&self, snapshot: &DashboardSnapshot) -> Result<String, minijinja::Error> {
        let template = self.environment.get_template(TEMPLATE_NAME)?;
        template.render(PageView::from_snapshot(snapshot))
    }
}
