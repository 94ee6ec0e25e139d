//! Document store adapter for the zoo registry.
//!
//! Owns pool construction (with a retry policy), embedded migrations, row
//! models and the repository layer.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::SqlitePool;

/// Tunable parameters for the exponential-backoff connect strategy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total connection attempts before giving up (at least one is made).
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

/// Connection settings for the store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite connection URL, e.g. `sqlite://zoo.db?mode=rwc`.
    pub url: String,
    pub max_connections: u32,
    pub retry: RetryConfig,
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`RetryConfig::max_delay`].
pub fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Create a connection pool, retrying with exponential backoff.
///
/// Returns the last connection error once `max_attempts` is exhausted.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    let mut delay = config.retry.initial_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let result = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options.clone())
            .await;

        match result {
            Ok(pool) => {
                tracing::debug!(attempt, "Store connection established");
                return Ok(pool);
            }
            Err(e) if attempt < config.retry.max_attempts => {
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Store connection attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = next_delay(delay, &config.retry);
            }
            Err(e) => {
                tracing::error!(attempt, error = %e, "Giving up on store connection");
                return Err(e);
            }
        }
    }
}

/// Round-trip a trivial query to confirm the store is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
