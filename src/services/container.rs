//! Service Container - Centralized service access.
//!
//! Handlers reach services only through this container, which owns one
//! shared Unit of Work behind both of them.

use std::sync::Arc;

use super::{AuthService, SettingsService};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get settings service
    fn settings(&self) -> Arc<dyn SettingsService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    settings_service: Arc<dyn SettingsService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        settings_service: Arc<dyn SettingsService>,
    ) -> Self {
        Self {
            auth_service,
            settings_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{Authenticator, SettingsManager};

        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let settings_service = Arc::new(SettingsManager::new(uow));

        Self {
            auth_service,
            settings_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn settings(&self) -> Arc<dyn SettingsService> {
        self.settings_service.clone()
    }
}
