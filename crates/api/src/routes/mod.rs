pub mod admin;
pub mod auth;
pub mod health;
pub mod iras;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree (everything except `/health` and
/// `/api/info`, which [`health::router`] mounts).
///
/// ```text
/// /iras/...     IRAS-compatible endpoints (client-id headers)
/// /auth/...     register, login, demo token, profile
/// /admin/...    record management (bearer token)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/iras", iras::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
