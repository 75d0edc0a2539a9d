//! Extractors that reject with [`AppError`] instead of axum's plain-text
//! rejections, so internal endpoints always answer in their envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use axum::http::StatusCode;
use iras_core::types::DbId;

use crate::error::AppError;

/// `Json<T>` whose rejection is "Invalid request format" (400).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::Detailed {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid request format",
            detail: rejection.body_text(),
        }
    }
}

/// A numeric `{id}` path segment. Anything else is "Invalid ID format" (400).
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub DbId);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Invalid ID format".into()))?;
        raw.trim()
            .parse::<DbId>()
            .map(IdPath)
            .map_err(|_| AppError::BadRequest("Invalid ID format".into()))
    }
}
