//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Registered member of the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub nickname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub url: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Current profile values
    pub fn profile(&self) -> Profile {
        Profile {
            bio: self.bio.clone(),
            url: self.url.clone(),
            occupation: self.occupation.clone(),
            location: self.location.clone(),
            profile_image: self.profile_image.clone(),
        }
    }

    /// Replace the profile values
    pub fn apply_profile(&mut self, profile: Profile) {
        self.bio = profile.bio;
        self.url = profile.url;
        self.occupation = profile.occupation;
        self.location = profile.location;
        self.profile_image = profile.profile_image;
        self.updated_at = Utc::now();
    }
}

/// Editable public profile of an account.
///
/// Absent values are `None`; the empty string is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub bio: Option<String>,
    pub url: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
}

/// Data needed to provision an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
}

/// Account as shown on settings pages (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[schema(example = "gicheol")]
    pub nickname: String,
    #[schema(example = "gicheol@example.com")]
    pub email: String,
    pub bio: Option<String>,
    pub url: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            nickname: account.nickname,
            email: account.email,
            bio: account.bio,
            url: account.url,
            occupation: account.occupation,
            location: account.location,
            profile_image: account.profile_image,
            created_at: account.created_at,
        }
    }
}
