//! Settings forms and their validation rules.
//!
//! Validation is explicit: each rule returns `Result<(), FormErrors>` and the
//! caller decides whether to commit or re-render.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use super::account::{Account, Profile};
use crate::config::{BIO_MAX_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, URL_MAX_LENGTH};

/// Result of a settings submission
#[derive(Debug)]
pub enum Submission<T> {
    /// Validation passed and the change was committed
    Applied(T),
    /// Validation failed; nothing was written
    Rejected(FormErrors),
}

/// Validation errors keyed by (wire) field name, plus form-level errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FormErrors {
    pub fields: BTreeMap<String, Vec<String>>,
    pub global: Vec<String>,
}

impl FormErrors {
    pub fn add_field(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_global(&mut self, message: impl Into<String>) {
        self.global.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.global.is_empty()
    }

    /// `Ok(())` when no error was recorded
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();

        for (field, errs) in errors.field_errors() {
            let field = camel_case(&field);
            for e in errs.iter() {
                form_errors.add_field(&field, describe(&field, e));
            }
        }

        form_errors
    }
}

/// Explicit messages win; length rules are spelled out from their bounds
fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match (error.params.get("min"), error.params.get("max")) {
        (Some(min), Some(max)) => format!("{field} must be {min} to {max} characters"),
        (None, Some(max)) => format!("{field} must be at most {max} characters"),
        (Some(min), None) => format!("{field} must be at least {min} characters"),
        (None, None) => format!("{field} is invalid"),
    }
}

/// Field names are reported the way clients submit them (`new_password` -> `newPassword`)
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// Profile
// =============================================================================

/// Profile settings form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    /// Short self introduction
    #[validate(length(max = BIO_MAX_LENGTH))]
    #[schema(example = "짧은 소개")]
    pub bio: Option<String>,
    /// Personal web page
    #[validate(length(max = URL_MAX_LENGTH))]
    #[schema(example = "https://example.com")]
    pub url: Option<String>,
    #[schema(example = "Backend developer")]
    pub occupation: Option<String>,
    #[schema(example = "Seoul")]
    pub location: Option<String>,
    pub profile_image: Option<String>,
}

impl ProfileForm {
    /// Profile values to store; blank inputs become absent
    pub fn into_profile(self) -> Profile {
        Profile {
            bio: non_blank(self.bio),
            url: non_blank(self.url),
            occupation: non_blank(self.occupation),
            location: non_blank(self.location),
            profile_image: non_blank(self.profile_image),
        }
    }
}

impl From<&Account> for ProfileForm {
    fn from(account: &Account) -> Self {
        Self {
            bio: account.bio.clone(),
            url: account.url.clone(),
            occupation: account.occupation.clone(),
            location: account.location.clone(),
            profile_image: account.profile_image.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Check profile field lengths.
pub fn validate_profile(form: &ProfileForm) -> Result<(), FormErrors> {
    form.validate().map_err(FormErrors::from)
}

// =============================================================================
// Password
// =============================================================================

/// Password change form. Never echoed back to the client with values.
#[derive(Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    #[serde(default)]
    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    #[schema(example = "12345678")]
    pub new_password: String,
    #[serde(default)]
    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    #[schema(example = "12345678")]
    pub new_password_confirm: String,
}

impl std::fmt::Debug for PasswordForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordForm")
            .field("new_password", &"[REDACTED]")
            .field("new_password_confirm", &"[REDACTED]")
            .finish()
    }
}

/// Check password lengths and that both entries match.
///
/// A mismatch is a form-level error, not tied to either field.
pub fn validate_password(form: &PasswordForm) -> Result<(), FormErrors> {
    let mut errors = match form.validate() {
        Ok(()) => FormErrors::default(),
        Err(e) => FormErrors::from(e),
    };

    if form.new_password != form.new_password_confirm {
        errors.add_global("New password and confirmation do not match");
    }

    errors.into_result()
}

// =============================================================================
// Tags
// =============================================================================

/// Tag add/remove request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagForm {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "rust")]
    pub tag_title: String,
}

/// Message for a tag title that is empty once trimmed
pub const BLANK_TAG_TITLE: &str = "Tag title is required";

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message(BLANK_TAG_TITLE.into()))
    } else {
        Ok(())
    }
}

/// Trimmed tag title, or `None` if nothing is left
pub fn normalize_tag_title(raw: &str) -> Option<String> {
    let title = raw.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
