//! Request body extraction with validation.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;
use vidcat_core::error::{field_errors, CoreError};

use crate::error::AppError;

/// JSON body that has been deserialized and then checked with
/// [`Validate::validate`].
///
/// Malformed JSON, a wrong content type, or wrongly typed fields are a
/// [`AppError::BadRequest`]. Validation failures are
/// [`CoreError::InvalidInput`] with one entry per offending field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| CoreError::InvalidInput(field_errors(&errors)))?;

        Ok(Self(value))
    }
}
