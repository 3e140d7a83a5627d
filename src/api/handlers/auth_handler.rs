//! Token issuance for settings clients.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::TokenResponse;

/// Credentials; `login` is matched against the email first, then the nickname
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Nickname or email is required"))]
    #[schema(example = "gicheol")]
    pub login: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "12345678")]
    pub password: String,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token for the settings routes", body = TokenResponse),
        (status = 400, description = "Missing login or password"),
        (status = 401, description = "Unknown account or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    state
        .auth_service
        .login(credentials.login, credentials.password)
        .await
        .map(Json)
}
