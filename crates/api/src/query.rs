//! Shared query parameter types for API handlers.

use iras_core::pagination::Page;
use serde::Deserialize;

/// Pagination parameters (`?page=&limit=`).
///
/// Both are taken as raw strings so that garbage falls back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PaginationParams {
    pub fn page(&self) -> Page {
        Page::parse(self.page.as_deref(), self.limit.as_deref())
    }
}
