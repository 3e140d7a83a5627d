//! API layer - HTTP handlers and middleware
//!
//! - Request handlers
//! - Middleware (authentication)
//! - Custom extractors
//! - Flash notices
//! - Route definitions

pub mod extractors;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
