//! Command-line and environment configuration.

use crate::database::{ConfigError, DATABASE_URL_ENV, DEFAULT_POOL_SIZE, DatabaseConfig};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;

/// Environment variable overriding the dashboard bind address.
pub const BIND_ENV: &str = "TASKBOARD_BIND";

/// Environment variable overriding the connection pool size.
pub const POOL_SIZE_ENV: &str = "TASKBOARD_POOL_SIZE";

/// Address the dashboard listens on when none is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Task tracking dashboard and maintenance commands.
#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about)]
pub struct Cli {
    /// Default log filter, overridden by `RUST_LOG`.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Database connection settings.
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Database flags shared by every command.
#[derive(Debug, Clone, Args)]
pub struct DatabaseArgs {
    /// `PostgreSQL` connection string.
    #[arg(long, env = DATABASE_URL_ENV, hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled connections.
    #[arg(long, env = POOL_SIZE_ENV, default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: u32,
}

impl DatabaseArgs {
    /// Validates the flags into a [`DatabaseConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when no connection string
    /// was given and [`ConfigError::InvalidPoolSize`] for a zero pool size.
    pub fn to_config(&self) -> Result<DatabaseConfig, ConfigError> {
        let url = self
            .database_url
            .clone()
            .ok_or(ConfigError::MissingDatabaseUrl)?;
        DatabaseConfig::new(url, self.pool_size)
    }
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the dashboard over HTTP.
    Serve {
        /// Socket address to bind.
        #[arg(long, env = BIND_ENV, default_value = DEFAULT_BIND)]
        bind: SocketAddr,
    },
    /// Apply pending schema migrations.
    Migrate,
    /// Insert sample tasks, a subtask and activity events.
    Seed,
}
