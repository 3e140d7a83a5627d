//! Bearer-token gate in front of the settings routes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// The account a settings request acts on. Handlers never take an account
/// id from the request body or path.
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub id: Uuid,
    pub nickname: String,
}

/// Token from `Authorization: Bearer <token>`; any other scheme is refused.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify the bearer token and attach `CurrentAccount` to the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.auth_service.verify_token(token)?;

    tracing::debug!(account_id = %claims.sub, "Request authenticated");
    request.extensions_mut().insert(CurrentAccount {
        id: claims.sub,
        nickname: claims.nickname,
    });

    Ok(next.run(request).await)
}
