//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, settings_handler};
use crate::domain::{AccountResponse, FormErrors, PasswordForm, ProfileForm, TagForm};
use crate::services::TokenResponse;
use crate::types::{PasswordPage, ProfilePage, TagsPage};

/// OpenAPI documentation for the account settings API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StudyOlle Account Settings",
        version = "0.1.0",
        description = "Profile, password and tag preferences of a study group member"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        settings_handler::profile_form,
        settings_handler::update_profile,
        settings_handler::password_form,
        settings_handler::update_password,
        settings_handler::tags_form,
        settings_handler::add_tag,
        settings_handler::remove_tag,
    ),
    components(
        schemas(
            AccountResponse,
            ProfileForm,
            PasswordForm,
            TagForm,
            FormErrors,
            ProfilePage,
            PasswordPage,
            TagsPage,
            auth_handler::LoginRequest,
            TokenResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login"),
        (name = "Settings", description = "Account settings of the logged-in member")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
