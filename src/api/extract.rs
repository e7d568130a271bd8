use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::models::Validate;

/// JSON extractor that applies the body's field rules after deserialization.
///
/// Malformed bodies and rule violations both reject as [`Error::Validation`],
/// so every bad request surfaces as a 400 naming what was wrong.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| Error::invalid("body", rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}
