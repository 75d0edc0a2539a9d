//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use iras_core::error::CoreError;
use iras_core::roles::ROLE_ADMIN;
use iras_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Prefix of the development-only bearer token.
pub const DEMO_TOKEN_PREFIX: &str = "demo-token";
const DEMO_TOKEN_MIN_LEN: usize = 10;

pub const DEMO_USER_ID: DbId = 999;
pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_EMAIL: &str = "demo@example.com";

/// Authenticated caller extracted from `Authorization: Bearer <token>`.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    /// Authenticated through the development demo token rather than a JWT.
    /// The demo identity has no row in `users`.
    pub is_demo: bool,
}

impl AuthUser {
    pub fn demo() -> Self {
        Self {
            user_id: DEMO_USER_ID,
            username: DEMO_USERNAME.to_string(),
            email: DEMO_EMAIL.to_string(),
            role: ROLE_ADMIN.to_string(),
            is_demo: true,
        }
    }
}

fn is_demo_token(token: &str) -> bool {
    token.starts_with(DEMO_TOKEN_PREFIX) && token.len() >= DEMO_TOKEN_MIN_LEN
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = |msg: &str| AppError::Core(CoreError::Unauthorized(msg.into()));

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| unauthorized("Authorization header required"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized("Invalid token format"))?;

        if state.config.is_development() && is_demo_token(token) {
            tracing::debug!("Authenticated with demo token");
            return Ok(AuthUser::demo());
        }

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized("Invalid token")
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
            role: claims.role,
            is_demo: false,
        })
    }
}
