//! JSON body extractor that also runs the `validator` rules of its payload.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::domain::FormErrors;
use crate::errors::AppError;

/// Undecodable bodies become `MalformedBody`; a broken field rule becomes
/// `InvalidField` naming the field as the client spells it.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;

        if let Err(errors) = payload.validate() {
            return Err(first_invalid_field(FormErrors::from(errors)));
        }

        Ok(ValidatedJson(payload))
    }
}

fn first_invalid_field(errors: FormErrors) -> AppError {
    errors
        .fields
        .into_iter()
        .find_map(|(field, messages)| {
            messages
                .into_iter()
                .next()
                .map(|message| AppError::invalid_field(field, message))
        })
        .unwrap_or_else(|| AppError::MalformedBody("payload failed validation".to_string()))
}
