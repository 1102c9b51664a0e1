//! Shared world state for task dependency BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::tracking::{
    adapters::memory::InMemoryTrackingRepository,
    domain::{Task, TaskDependency, TaskId},
    services::{TaskTrackingService, TrackingServiceError},
};

/// Service type used by the BDD world.
pub type TestTrackingService = TaskTrackingService<InMemoryTrackingRepository, DefaultClock>;

/// Scenario world for task dependency behaviour tests.
pub struct DependencyWorld {
    pub service: TestTrackingService,
    pub tasks: HashMap<String, TaskId>,
    pub last_dependency_result: Option<Result<TaskDependency, TrackingServiceError>>,
    pub last_status_result: Option<Result<Task, TrackingServiceError>>,
}

impl DependencyWorld {
    /// Creates a world with no tasks.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskTrackingService::new(
            Arc::new(InMemoryTrackingRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            tasks: HashMap::new(),
            last_dependency_result: None,
            last_status_result: None,
        }
    }

    /// Looks up a task created earlier in the scenario by its title.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} in scenario world"))
    }
}

impl Default for DependencyWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DependencyWorld {
    DependencyWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
