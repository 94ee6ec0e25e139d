use std::sync::Arc;

use crate::config::ServerConfig;
use crate::habitat::HabitatService;
use crate::identity::{IdentityService, IdentitySettings};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Store connection pool.
    pub pool: zoo_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Credential lifecycle and request authorization.
    pub identity: Arc<IdentityService>,
    /// Zoo/animal edge maintenance.
    pub habitat: Arc<HabitatService>,
}

impl AppState {
    /// Wire both services onto one pool.
    pub fn new(pool: zoo_db::DbPool, config: ServerConfig) -> Self {
        let identity = IdentityService::new(
            pool.clone(),
            IdentitySettings {
                jwt: config.jwt.clone(),
                password_min_length: config.password_min_length,
                password_reset_enabled: config.password_reset_enabled,
            },
        );
        let habitat = HabitatService::new(pool.clone(), config.zoo_deletion_policy);

        Self {
            pool,
            config: Arc::new(config),
            identity: Arc::new(identity),
            habitat: Arc::new(habitat),
        }
    }
}
