//! Domain layer - Core business entities and logic
//!
//! Accounts, tags, the password value object, and the settings forms with
//! their validation rules. Nothing in here touches the database or HTTP.

pub mod account;
pub mod password;
pub mod settings;
pub mod tag;

pub use account::{Account, AccountResponse, NewAccount, Profile};
pub use password::Password;
pub use settings::{
    normalize_tag_title, validate_password, validate_profile, FormErrors, PasswordForm,
    ProfileForm, Submission, TagForm, BLANK_TAG_TITLE,
};
pub use tag::Tag;
