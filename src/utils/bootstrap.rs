//! Bootstrap utilities for forumdb binaries.

use std::future::Future;
use std::time::Duration;

use backon::Retryable;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::retry::connection_backoff;
use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the FORUMDB_LOG environment variable.
///
/// Defaults to "info" level if FORUMDB_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect to a database with exponential backoff retry.
///
/// # Arguments
/// * `backend` - Human-readable name for logging (e.g., "postgres")
/// * `address` - Connection target, logged as given
/// * `connect` - Async function that attempts to establish a connection
///
/// # Returns
/// The connection on success, or the last error once retries are exhausted.
pub async fn connect_with_retry<T, E, F, Fut>(
    backend: &str,
    address: &str,
    connect: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let result = connect
        .retry(connection_backoff())
        .notify(|err: &E, dur: Duration| {
            warn!(backend = %backend, error = %err, delay = ?dur, "Connection failed, retrying");
        })
        .await;

    match &result {
        Ok(_) => tracing::info!(backend = %backend, address = %address, "Connected"),
        Err(e) => tracing::error!(backend = %backend, address = %address, error = %e, "Connection failed"),
    }
    result
}
