//! URL-encoded form extractor.
//!
//! Unlike `ValidatedJson`, field rules are not checked here: settings forms
//! are validated by the service so that failures can be re-rendered.

use axum::{
    async_trait,
    extract::{rejection::FormRejection, FromRequest, Request},
    Form,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Form body whose decoding errors use the JSON error envelope.
pub struct FormInput<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormInput<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;

        Ok(FormInput(value))
    }
}
