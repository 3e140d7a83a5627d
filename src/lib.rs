//! StudyOlle account settings
//!
//! Lets a logged-in study group member edit their profile, change their
//! password and manage their tag preferences.
//!
//! Requests flow `api` -> `services` -> `infra`. `domain` holds the forms
//! and their rules, and never touches HTTP or the database. `cli` and
//! `commands` wrap the same services for provisioning and migrations.
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Provision an account
//! cargo run -- account create --nickname gicheol --email gicheol@example.com --password 12345678
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Account, Password, Tag};
pub use errors::{AppError, AppResult};
