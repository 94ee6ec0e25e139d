use std::str::FromStr;
use std::time::Duration;

use zoo_core::habitat::ZooDeletionPolicy;
use zoo_db::{DbConfig, RetryConfig};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Store connection and retry settings.
    pub database: DbConfig,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Minimum password length in characters (default: `1`).
    pub password_min_length: usize,
    /// Whether the unauthenticated reset-by-username endpoint is served
    /// (default: `true`).
    pub password_reset_enabled: bool,
    /// What deleting a zoo does to its animals (default: `detach`).
    pub zoo_deletion_policy: ZooDeletionPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                     |
    /// |-------------------------------|-----------------------------|
    /// | `HOST`                        | `0.0.0.0`                   |
    /// | `PORT`                        | `3000`                      |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                        |
    /// | `DATABASE_URL`                | `sqlite://zoo.db?mode=rwc`  |
    /// | `DB_MAX_CONNECTIONS`          | `5`                         |
    /// | `DB_CONNECT_ATTEMPTS`         | `5`                         |
    /// | `DB_CONNECT_INITIAL_DELAY_MS` | `250`                       |
    /// | `DB_CONNECT_MAX_DELAY_MS`     | `5000`                      |
    /// | `PASSWORD_MIN_LENGTH`         | `1`                         |
    /// | `PASSWORD_RESET_ENABLED`      | `true`                      |
    /// | `ZOO_DELETION_POLICY`         | `detach`                    |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on any unparseable value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);

        let retry = RetryConfig {
            max_attempts: env_or("DB_CONNECT_ATTEMPTS", 5),
            initial_delay: Duration::from_millis(env_or("DB_CONNECT_INITIAL_DELAY_MS", 250)),
            max_delay: Duration::from_millis(env_or("DB_CONNECT_MAX_DELAY_MS", 5000)),
            ..RetryConfig::default()
        };
        let database = DbConfig {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://zoo.db?mode=rwc".into()),
            max_connections: env_or("DB_MAX_CONNECTIONS", 5),
            retry,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database,
            jwt,
            password_min_length: env_or("PASSWORD_MIN_LENGTH", 1),
            password_reset_enabled: env_or("PASSWORD_RESET_ENABLED", true),
            zoo_deletion_policy: env_or("ZOO_DELETION_POLICY", ZooDeletionPolicy::default()),
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
