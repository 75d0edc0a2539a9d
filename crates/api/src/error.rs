use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use iras_core::error::CoreError;
use iras_db::RepoError;

use crate::response::ApiResponse;

/// Application-level error type for the internal (auth and admin) handlers.
///
/// Renders the internal envelope `{success: false, message, error}`. IRAS
/// endpoints never return this type; they answer with their own envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `iras_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store failure, including constraint violations.
    #[error(transparent)]
    Repo(#[from] RepoError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A failure whose message and `error` detail are both chosen by the handler.
    #[error("{message}: {detail}")]
    Detailed {
        status: StatusCode,
        message: &'static str,
        detail: String,
    },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, error) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    tracing::debug!(entity, id, "Entity not found");
                    (
                        StatusCode::NOT_FOUND,
                        format!("{entity} not found"),
                        "NOT_FOUND".to_string(),
                    )
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR".to_string())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT".to_string()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED".to_string())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, "FORBIDDEN".to_string()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_MESSAGE.to_string(),
                        "INTERNAL_ERROR".to_string(),
                    )
                }
            },

            // --- Store errors ---
            AppError::Repo(err) => classify_repo_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST".to_string()),
            AppError::Detailed {
                status,
                message,
                detail,
            } => (status, message.to_string(), detail),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                    "INTERNAL_ERROR".to_string(),
                )
            }
        };

        (status, Json(ApiResponse::<()>::failure(message, Some(error)))).into_response()
    }
}

/// Map a store error to an HTTP status, caller message and error code.
///
/// - Unique violations map to 409.
/// - Foreign-key violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_repo_error(err: RepoError) -> (StatusCode, String, String) {
    match err {
        RepoError::UniqueViolation(constraint) => (
            StatusCode::CONFLICT,
            format!("Duplicate value violates unique constraint: {constraint}"),
            "CONFLICT".to_string(),
        ),
        RepoError::ForeignKeyViolation(constraint) => (
            StatusCode::BAD_REQUEST,
            format!("Referenced record does not exist: {constraint}"),
            "FOREIGN_KEY_VIOLATION".to_string(),
        ),
        RepoError::Database(err) => {
            tracing::error!(error = %err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
                "INTERNAL_ERROR".to_string(),
            )
        }
    }
}
