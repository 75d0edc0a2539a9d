//! HTTP handlers, one module per endpoint family.
//!
//! IRAS endpoints answer in [`IrasResponse`]; auth and admin endpoints use
//! [`crate::response::ApiResponse`] and fail through [`AppError`].

pub mod ais;
pub mod auth;
pub mod categories;
pub mod cit;
pub mod corppass;
pub mod estamp;
pub mod gst;
pub mod products;
pub mod property;
pub mod rental;
pub mod singpass;
pub mod stamp_duty;
pub mod users;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use iras_core::error::CoreError;
use iras_core::types::DbId;
use iras_core::validation::INTERNAL_CODE;
use iras_db::RepoError;

use crate::error::{AppError, AppResult};
use crate::response::IrasResponse;

/// Unwrap an optional row or fail with "<entity> not found" (404).
pub(crate) fn found<T>(row: Option<T>, entity: &'static str, id: DbId) -> AppResult<T> {
    row.ok_or(AppError::Core(CoreError::NotFound { entity, id }))
}

/// Like [`found`] for lookups by a natural key rather than by id.
pub(crate) fn found_by_key<T>(row: Option<T>, message: &'static str) -> AppResult<T> {
    row.ok_or_else(|| AppError::Detailed {
        status: StatusCode::NOT_FOUND,
        message,
        detail: "NOT_FOUND".to_string(),
    })
}

/// Fail with "<entity> not found" (404) when a soft delete touched nothing.
pub(crate) fn deleted(removed: bool, entity: &'static str, id: DbId) -> AppResult<()> {
    if removed {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound { entity, id }))
    }
}

/// Log a store failure behind an IRAS endpoint and answer `returnCode` 50.
pub(crate) fn iras_store_failure(err: RepoError, operation: &'static str) -> Response {
    tracing::error!(error = %err, operation, "Store failure on IRAS endpoint");
    IrasResponse::<()>::internal(INTERNAL_CODE).into_response()
}
