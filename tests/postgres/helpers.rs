//! Shared helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::fixture;
use taskboard::database::{self, DatabaseConfig, PgPool};
use tokio::runtime::Runtime;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating every tracking table.
pub const CREATE_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_tracking_tables/up.sql");

/// Template database name for pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskboard_test_template";

/// Pool size for test databases; dashboard queries run concurrently.
const TEST_POOL_SIZE: u32 = 3;

#[fixture]
pub fn clock() -> DefaultClock {
    DefaultClock
}

/// Creates a runtime for driving the async repositories from sync tests.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_TABLES_SQL)
                .map_err(|e| eyre::eyre!("SQL error: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Builds a pool against `db_name` through the production connector.
pub fn connect(cluster: &TestCluster, db_name: &str) -> Result<PgPool, BoxError> {
    let url = cluster.connection().database_url(db_name);
    let config = DatabaseConfig::new(url, TEST_POOL_SIZE)?;
    Ok(database::connect(&config)?)
}

/// Creates a database from the migrated template and returns a pool for it.
pub fn setup_pool(cluster: &TestCluster, db_name: &str) -> Result<PgPool, BoxError> {
    ensure_template(cluster)?;
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    connect(cluster, db_name)
}

/// Returns a unique database name with the given prefix.
pub fn unique_db_name(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}

/// Drops the test database even if the test panics.
///
/// Declare the guard before the pool so the pool closes first.
pub struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    pub const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(&*self.db_name) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.db_name);
        }
    }
}
