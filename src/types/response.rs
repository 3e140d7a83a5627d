use axum::{http::StatusCode, response::IntoResponse};

/// Bare 200 acknowledgement with an empty body
pub struct Ack;

impl IntoResponse for Ack {
    fn into_response(self) -> axum::response::Response {
        StatusCode::OK.into_response()
    }
}
