//! JSON extractor that runs `validator` checks before the handler.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserialize a JSON body and validate it.
///
/// Malformed JSON is rejected with `JSON_EXTRACTION`; failed validation with
/// `VALIDATION_ERROR` and per-field details.
///
/// ```ignore
/// async fn create_category(
///     ValidatedJson(input): ValidatedJson<CreateCategory>,
/// ) -> CatalogResult<impl IntoResponse> {
///     // input.name and input.slug are already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
