//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) and reach
//! repositories through the Unit of Work.

mod auth_service;
pub mod container;
mod settings_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use settings_service::{SettingsManager, SettingsService, TagSettings};
