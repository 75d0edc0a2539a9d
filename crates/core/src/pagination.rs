//! Page/limit arithmetic shared by every admin list endpoint.

use serde::Serialize;

/// Page size used when the caller omits `limit` or sends an unusable value.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on `limit`; anything larger falls back to [`DEFAULT_LIMIT`].
pub const MAX_LIMIT: i64 = 100;

/// A normalized page request. Construct via [`Page::new`] or [`Page::parse`]
/// so the clamping rules always apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Clamp raw numbers: `page` below 1 becomes 1, `limit` outside
    /// `1..=MAX_LIMIT` becomes [`DEFAULT_LIMIT`].
    pub fn new(page: i64, limit: i64) -> Self {
        let page = page.max(1);
        let limit = if (1..=MAX_LIMIT).contains(&limit) {
            limit
        } else {
            DEFAULT_LIMIT
        };
        Self { page, limit }
    }

    /// Build a page from raw query-string values. Missing or unparsable
    /// values take their defaults.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page.and_then(|p| p.trim().parse::<i64>().ok()).unwrap_or(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT);
        Self::new(page, limit)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Number of pages needed to hold `total` rows (ceiling division).
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- clamping -----------------------------------------------------------

    #[test]
    fn page_below_one_is_clamped() {
        assert_eq!(Page::new(0, 10).page, 1);
        assert_eq!(Page::new(-5, 10).page, 1);
    }

    #[test]
    fn out_of_range_limit_falls_back_to_default() {
        assert_eq!(Page::new(1, 0).limit, DEFAULT_LIMIT);
        assert_eq!(Page::new(1, 101).limit, DEFAULT_LIMIT);
        assert_eq!(Page::new(1, 100).limit, 100);
        assert_eq!(Page::new(1, 1).limit, 1);
    }

    #[test]
    fn unparsable_values_use_defaults() {
        let page = Page::parse(Some("abc"), Some("lots"));
        assert_eq!(page, Page::default());

        let page = Page::parse(None, None);
        assert_eq!(page, Page::default());

        let page = Page::parse(Some("3"), Some("25"));
        assert_eq!(page, Page { page: 3, limit: 25 });
    }

    // -- offset / total_pages ----------------------------------------------

    #[test]
    fn offset_follows_page_and_limit() {
        for (page, limit) in [(1, 10), (2, 10), (5, 7), (0, 500), (-1, -1)] {
            let p = Page::new(page, limit);
            let expected_limit = if (1..=100).contains(&limit) { limit } else { 10 };
            assert_eq!(p.offset(), (page.max(1) - 1) * expected_limit);
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Page::new(1, 10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }
}
