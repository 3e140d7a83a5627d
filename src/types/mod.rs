//! Shared response types.

mod response;
mod views;

pub use response::Ack;
pub use views::{PasswordPage, ProfilePage, TagsPage};
