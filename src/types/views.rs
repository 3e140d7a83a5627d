//! JSON views returned by the settings pages.
//!
//! Each view names the page it stands for in `view` and carries the model
//! attributes that page renders.

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{VIEW_SETTINGS_PASSWORD, VIEW_SETTINGS_PROFILE, VIEW_SETTINGS_TAGS};
use crate::domain::{Account, AccountResponse, FormErrors, PasswordForm, ProfileForm};

/// Profile settings page
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePage {
    #[schema(example = "settings/profile")]
    pub view: String,
    pub account: AccountResponse,
    pub profile: ProfileForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FormErrors>,
}

impl ProfilePage {
    /// Page pre-filled from the stored profile
    pub fn new(account: Account) -> Self {
        let profile = ProfileForm::from(&account);
        Self::with_form(account, profile)
    }

    /// Page showing a specific (possibly invalid) submission
    pub fn with_form(account: Account, profile: ProfileForm) -> Self {
        Self {
            view: VIEW_SETTINGS_PROFILE.to_string(),
            account: AccountResponse::from(account),
            profile,
            message: None,
            errors: None,
        }
    }

    pub fn message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub fn errors(mut self, errors: FormErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Password settings page. The form is always empty.
#[derive(Debug, Serialize, ToSchema)]
pub struct PasswordPage {
    #[schema(example = "settings/password")]
    pub view: String,
    pub account: AccountResponse,
    #[serde(rename = "passwordForm")]
    pub password_form: PasswordForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FormErrors>,
}

impl PasswordPage {
    pub fn new(account: Account) -> Self {
        Self {
            view: VIEW_SETTINGS_PASSWORD.to_string(),
            account: AccountResponse::from(account),
            password_form: PasswordForm::default(),
            message: None,
            errors: None,
        }
    }

    pub fn message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub fn errors(mut self, errors: FormErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Tag preference page
#[derive(Debug, Serialize, ToSchema)]
pub struct TagsPage {
    #[schema(example = "settings/tags")]
    pub view: String,
    pub account: AccountResponse,
    /// Titles associated with the account
    #[schema(example = json!(["rust", "spring"]))]
    pub tags: Vec<String>,
    /// Every known tag title
    #[schema(example = json!(["jpa", "rust", "spring"]))]
    pub whitelist: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TagsPage {
    pub fn new(account: Account, tags: Vec<String>, whitelist: Vec<String>) -> Self {
        Self {
            view: VIEW_SETTINGS_TAGS.to_string(),
            account: AccountResponse::from(account),
            tags,
            whitelist,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }
}
