//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, ServiceContainer, Services, SettingsService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Settings service
    pub settings_service: Arc<dyn SettingsService>,
    /// Database connection (health checks)
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config,
    /// wiring every service through one `Services` container.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database)
    }

    /// Create application state from any service container.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            settings_service: container.settings(),
            database,
        }
    }
}
