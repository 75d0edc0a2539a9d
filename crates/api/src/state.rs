use std::sync::Arc;

use iras_db::Repositories;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the config sits behind an `Arc` and every store in
/// [`Repositories`] is an `Arc<dyn ...>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// PostgreSQL stores in production, in-memory stores in tests.
    pub repos: Repositories,
}

impl AppState {
    pub fn new(config: ServerConfig, repos: Repositories) -> Self {
        Self {
            config: Arc::new(config),
            repos,
        }
    }
}
