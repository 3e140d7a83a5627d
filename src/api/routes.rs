//! Router assembly: public probes and docs, login, and the token-gated settings pages.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{auth_routes, settings_routes};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/auth", auth_routes())
        // Settings pages act on the authenticated account only
        .nest(
            "/settings",
            settings_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "StudyOlle account settings"
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    database: Component,
}

#[derive(Serialize)]
struct Component {
    status: &'static str,
}

impl Health {
    fn reporting(status: &'static str) -> Json<Self> {
        Json(Self {
            status,
            database: Component { status },
        })
    }
}

/// 503 while the database does not answer; the cause is only logged
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.database.ping().await {
        Ok(()) => (StatusCode::OK, Health::reporting("healthy")),
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, Health::reporting("unhealthy"))
        }
    }
}
