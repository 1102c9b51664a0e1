//! Dashboard aggregate queries against `PostgreSQL`.

use crate::postgres::helpers::{CleanupGuard, clock, setup_pool, test_runtime, unique_db_name};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use std::sync::Arc;
use taskboard::dashboard::{
    adapters::PostgresDashboardQueries,
    domain::StatusCount,
    ports::DashboardQueries,
    render::DashboardRenderer,
    services::DashboardService,
};
use taskboard::tracking::{
    adapters::postgres::PostgresTrackingRepository,
    domain::{HookEvent, TaskStatus},
    services::seed_sample_data,
};

#[rstest]
fn empty_database_reports_zero_totals(shared_test_cluster: &'static TestCluster) {
    let db_name = unique_db_name("test_dashboard_empty");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let queries =
        PostgresDashboardQueries::new(setup_pool(shared_test_cluster, &db_name).expect("database setup"));
    let rt = test_runtime();

    let totals = rt.block_on(queries.task_totals()).expect("totals query");
    let statuses = rt.block_on(queries.status_counts()).expect("status query");
    let activity = rt
        .block_on(queries.recent_activity(10))
        .expect("activity query");

    assert_eq!(totals.total_tasks, 0);
    assert_eq!(totals.total_cost_usd, 0.0);
    assert!(statuses.is_empty());
    assert!(activity.is_empty());
}

#[rstest]
fn seeded_database_feeds_the_dashboard(
    clock: DefaultClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db_name = unique_db_name("test_dashboard_seeded");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = setup_pool(shared_test_cluster, &db_name).expect("database setup");
    let rt = test_runtime();
    let summary = rt
        .block_on(seed_sample_data(
            &PostgresTrackingRepository::new(pool.clone()),
            &clock,
        ))
        .expect("seed should succeed");
    let queries = PostgresDashboardQueries::new(pool);

    let totals = rt.block_on(queries.task_totals()).expect("totals query");
    let statuses = rt.block_on(queries.status_counts()).expect("status query");
    let activity = rt
        .block_on(queries.recent_activity(2))
        .expect("activity query");

    assert_eq!(summary.tasks, 3);
    assert_eq!(totals.total_tasks, 3);
    assert_eq!(format!("{:.2}", totals.total_cost_usd), "0.57");
    assert_eq!(
        statuses,
        vec![
            StatusCount {
                status: TaskStatus::Completed,
                count: 1,
            },
            StatusCount {
                status: TaskStatus::InProgress,
                count: 1,
            },
            StatusCount {
                status: TaskStatus::Pending,
                count: 1,
            },
        ]
    );
    assert_eq!(activity.len(), 2);
    assert_eq!(
        activity.first().map(|entry| &entry.hook_event),
        Some(&HookEvent::Stop)
    );
    assert_eq!(
        activity.get(1).and_then(|entry| entry.tool_name.as_deref()),
        Some("Read")
    );

    let service = DashboardService::new(Arc::new(queries));
    let snapshot = rt.block_on(service.snapshot()).expect("snapshot");
    let html = DashboardRenderer::new()
        .expect("template should parse")
        .render(&snapshot)
        .expect("render should succeed");
    assert!(html.contains(r#"id="total-cost">$0.57</p>"#));
}
