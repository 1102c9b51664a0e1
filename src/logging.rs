//! Tracing subscriber setup for the binary.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Failures while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The fallback filter directive did not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Installs a formatted stderr subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter` when it is set and
/// valid.
///
/// # Errors
///
/// Returns [`LoggingError`] when `default_filter` is not a valid directive
/// or a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()?;
    Ok(())
}
