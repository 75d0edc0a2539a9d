//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register      -> register (public)
/// POST /login         -> login (public)
/// GET  /demo-token    -> demo_token (development only)
/// GET  /profile       -> get_profile (requires auth)
/// PUT  /profile       -> update_profile (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/demo-token", get(auth::demo_token))
        .route(
            "/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
}
