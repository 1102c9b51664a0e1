//! Migration runner tests.

use crate::postgres::helpers::{CleanupGuard, clock, connect, test_runtime, unique_db_name};
use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use mockable::DefaultClock;
use taskboard::database::{apply_migrations, apply_migrations_async, revert_last_migration};
use taskboard::tracking::{adapters::postgres::PostgresTrackingRepository, services::seed_sample_data};

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = diesel::sql_types::Text)]
    table_name: String,
}

const TRACKING_TABLES: [&str; 5] = [
    "agent_activity",
    "mlflow_traces",
    "subtasks",
    "task_dependencies",
    "tasks",
];

fn public_tables(conn: &mut PgConnection) -> Vec<String> {
    diesel::sql_query(
        "SELECT table_name::text AS table_name FROM information_schema.tables \
         WHERE table_schema = 'public' AND table_name <> '__diesel_schema_migrations' \
         ORDER BY table_name",
    )
    .load::<TableName>(conn)
    .expect("catalog query")
    .into_iter()
    .map(|row| row.table_name)
    .collect()
}

#[rstest]
fn migrations_create_tables_once(shared_test_cluster: &'static TestCluster) {
    let db_name = unique_db_name("test_migrations");
    shared_test_cluster
        .create_database_from_template(&*db_name, "template0")
        .expect("empty database should be created");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = connect(shared_test_cluster, &db_name).expect("pool setup");

    let first = apply_migrations(&pool).expect("first run should succeed");
    let second = test_runtime()
        .block_on(apply_migrations_async(pool.clone()))
        .expect("second run should succeed");

    assert_eq!(first, vec!["20261001000000".to_owned()]);
    assert!(second.is_empty());

    let mut conn = pool.get().expect("connection checkout");
    assert_eq!(public_tables(&mut conn), TRACKING_TABLES);
}

#[rstest]
fn revert_drops_tables_and_allows_reapply(shared_test_cluster: &'static TestCluster) {
    let db_name = unique_db_name("test_migration_revert");
    shared_test_cluster
        .create_database_from_template(&*db_name, "template0")
        .expect("empty database should be created");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = connect(shared_test_cluster, &db_name).expect("pool setup");

    apply_migrations(&pool).expect("migrations should apply");
    let reverted = revert_last_migration(&pool).expect("revert should succeed");
    let mut conn = pool.get().expect("connection checkout");
    let after_revert = public_tables(&mut conn);
    drop(conn);
    let reapplied = apply_migrations(&pool).expect("migrations should reapply");

    assert_eq!(reverted, "20261001000000");
    assert!(after_revert.is_empty());
    assert_eq!(reapplied, vec![reverted]);
}

#[rstest]
fn seed_runs_on_a_freshly_migrated_database(
    clock: DefaultClock,
    shared_test_cluster: &'static TestCluster,
) {
    let db_name = unique_db_name("test_migrate_then_seed");
    shared_test_cluster
        .create_database_from_template(&*db_name, "template0")
        .expect("empty database should be created");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool = connect(shared_test_cluster, &db_name).expect("pool setup");
    let rt = test_runtime();

    rt.block_on(apply_migrations_async(pool.clone()))
        .expect("migrations should apply");
    let summary = rt
        .block_on(seed_sample_data(&PostgresTrackingRepository::new(pool), &clock))
        .expect("seed should succeed");

    assert_eq!(summary.tasks, 3);
    assert_eq!(summary.subtasks, 1);
    assert_eq!(summary.activity_events, 3);
}
