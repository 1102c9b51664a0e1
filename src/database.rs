//! Connection pooling and schema migrations for the tracking database.
//!
//! The pool is created once at startup and handed to adapters explicitly.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Environment variable holding the `PostgreSQL` connection string.
pub const DATABASE_URL_ENV: &str = "POSTGRES_URL";

/// Pool size used when none is configured.
pub const DEFAULT_POOL_SIZE: u32 = 5;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// `PostgreSQL` connection pool shared by every adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema migrations compiled in from `migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Boxed error returned by the migration harness.
pub type MigrationError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration errors raised before any connection is attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No connection string was provided.
    #[error("POSTGRES_URL is not set")]
    MissingDatabaseUrl,
    /// The pool size is zero or not a number.
    #[error("invalid pool size {0:?}, expected a positive integer")]
    InvalidPoolSize(String),
}

/// Failures while connecting to or migrating the database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The pool could not establish its initial connections.
    #[error("database unreachable: {0}")]
    Unreachable(#[from] PoolError),
    /// A statement failed.
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),
    /// A migration failed to apply or revert.
    #[error("migration failed: {0}")]
    Migration(#[source] MigrationError),
    /// The blocking task running the work was cancelled or panicked.
    #[error("database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Connection settings for the tracking database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    url: String,
    pool_size: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

impl DatabaseConfig {
    /// Creates a configuration from a connection string and pool size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when the URL is blank and
    /// [`ConfigError::InvalidPoolSize`] when the pool size is zero.
    pub fn new(url: impl Into<String>, pool_size: u32) -> Result<Self, ConfigError> {
        let raw_url = url.into();
        if raw_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize(pool_size.to_string()));
        }
        Ok(Self {
            url: raw_url,
            pool_size,
        })
    }

    /// Returns the connection string. Never log this value.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }
}

/// Builds a connection pool and establishes its initial connections.
///
/// # Errors
///
/// Returns [`DatabaseError::Unreachable`] when no connection can be opened
/// within the connect timeout.
pub fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let manager = ConnectionManager::<PgConnection>::new(config.url());
    let pool = Pool::builder()
        .max_size(config.pool_size())
        .connection_timeout(CONNECT_TIMEOUT)
        .build(manager)?;
    info!(pool_size = config.pool_size(), "database pool ready");
    Ok(pool)
}

/// Applies every pending embedded migration.
///
/// Returns the versions applied by this call; an up-to-date database yields
/// an empty list.
///
/// # Errors
///
/// Returns [`DatabaseError`] when a connection cannot be checked out or a
/// migration fails. Each migration runs in its own transaction.
pub fn apply_migrations(pool: &PgPool) -> Result<Vec<String>, DatabaseError> {
    let mut pooled = pool.get()?;
    let connection: &mut PgConnection = &mut pooled;
    let versions = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(DatabaseError::Migration)?;
    let applied: Vec<String> = versions.iter().map(ToString::to_string).collect();
    for version in &applied {
        info!(version = %version, "migration applied");
    }
    Ok(applied)
}

/// Runs [`apply_migrations`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`DatabaseError`] when migration fails or the blocking task is
/// cancelled.
pub async fn apply_migrations_async(pool: PgPool) -> Result<Vec<String>, DatabaseError> {
    tokio::task::spawn_blocking(move || apply_migrations(&pool)).await?
}

/// Reverts the most recently applied migration and returns its version.
///
/// # Errors
///
/// Returns [`DatabaseError::Migration`] when nothing is applied or the
/// `down.sql` script fails.
pub fn revert_last_migration(pool: &PgPool) -> Result<String, DatabaseError> {
    let mut pooled = pool.get()?;
    let connection: &mut PgConnection = &mut pooled;
    let version = connection
        .revert_last_migration(MIGRATIONS)
        .map_err(DatabaseError::Migration)?;
    info!(version = %version, "migration reverted");
    Ok(version.to_string())
}
