//! Taskboard command-line entry point.

use clap::Parser;
use eyre::WrapErr;
use mockable::DefaultClock;
use std::sync::Arc;
use taskboard::{
    config::{Cli, Command},
    dashboard::{
        adapters::PostgresDashboardQueries, render::DashboardRenderer, server,
        services::DashboardService,
    },
    database::{self, PgPool},
    logging,
    tracking::{adapters::postgres::PostgresTrackingRepository, services::seed_sample_data},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let config = cli.database.to_config()?;
    let pool = tokio::task::spawn_blocking(move || database::connect(&config))
        .await
        .wrap_err("database connection task failed")??;

    match cli.command {
        Command::Migrate => migrate(pool).await,
        Command::Seed => {
            migrate(pool.clone()).await?;
            seed(pool).await
        }
        Command::Serve { bind } => {
            migrate(pool.clone()).await?;
            let listener = TcpListener::bind(bind)
                .await
                .wrap_err_with(|| format!("failed to bind {bind}"))?;
            let queries = Arc::new(PostgresDashboardQueries::new(pool));
            let state = server::AppState::new(
                DashboardService::new(queries),
                Arc::new(DashboardRenderer::new()?),
            );
            server::serve(listener, state, shutdown_signal()).await?;
            info!("dashboard stopped");
            Ok(())
        }
    }
}

async fn migrate(pool: PgPool) -> eyre::Result<()> {
    let applied = database::apply_migrations_async(pool).await?;
    if applied.is_empty() {
        info!("schema already up to date");
    } else {
        info!(?applied, "schema migrated");
    }
    Ok(())
}

async fn seed(pool: PgPool) -> eyre::Result<()> {
    let repository = PostgresTrackingRepository::new(pool);
    let summary = seed_sample_data(&repository, &DefaultClock).await?;
    info!(%summary, "seed complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
