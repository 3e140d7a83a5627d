//! Request-ending errors and their JSON envelope.
//!
//! A rejected settings form is not an error: it comes back as `FormErrors`
//! and the page is re-rendered. Everything in `AppError` stops the request
//! with `{ "error": { "code", "message", "field"? } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// The authenticated account no longer exists
    #[error("Account not found")]
    AccountNotFound,

    /// A unique account attribute (nickname or email) is in use
    #[error("{0} is already taken")]
    Taken(&'static str),

    /// The body could not be decoded at all
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// The body decoded but one field breaks a rule
    #[error("{message}")]
    InvalidField { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Internal server error")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct Envelope<'a> {
    error: EnvelopeBody<'a>,
}

#[derive(Serialize)]
struct EnvelopeBody<'a> {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

impl AppError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::Jwt(_) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR"),
            AppError::AccountNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Taken(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::MalformedBody(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::InvalidField { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Config(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Server-side failures are logged in full and answered generically
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database failure");
                "A database error occurred".to_string()
            }
            AppError::Config(detail) | AppError::Internal(detail) => {
                tracing::error!(%detail, "Internal failure");
                "An internal error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!(error = %e, "Token rejected");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let field = match &self {
            AppError::InvalidField { field, .. } => Some(field.as_str()),
            _ => None,
        };

        let body = Envelope {
            error: EnvelopeBody {
                code,
                message,
                field,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// `Option<Account>` lookups that must find the caller's account
pub trait OptionExt<T> {
    fn ok_or_account_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_account_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::AccountNotFound)
    }
}
