use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body that rejects with this crate's error envelope.
///
/// axum's stock `Json` rejection is plain text; catalog clients expect every
/// failure as `ErrorBody`, so malformed or mistyped payloads surface as
/// `VALIDATION_ERROR` like any other bad input.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(payload)) => Ok(AppJson(payload)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}
