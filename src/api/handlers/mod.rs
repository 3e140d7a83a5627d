//! HTTP request handlers.

pub mod auth_handler;
pub mod settings_handler;

pub use auth_handler::auth_routes;
pub use settings_handler::settings_routes;
