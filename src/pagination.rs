//! Page bounds and the paginated response envelope.

use serde::Serialize;
use utoipa::ToSchema;

/// Page size when the request does not specify `per_page`.
pub const DEFAULT_PER_PAGE: u64 = 15;

/// Upper bound for `per_page`. Requests above it are clamped, not rejected.
pub const MAX_PER_PAGE: u64 = 1000;

/// Sanitized pagination input, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub page: u64,
    pub per_page: u64,
}

/// Clamp raw `page`/`per_page` parameters into usable bounds.
#[must_use]
pub fn page_bounds(page: Option<u64>, per_page: Option<u64>) -> PageBounds {
    PageBounds {
        page: page.unwrap_or(1).max(1),
        per_page: per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE),
    }
}

/// One page of results plus the counters the consuming clients page with.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T> {
    /// Rows on this page
    pub data: Vec<T>,
    /// Total rows matching the filter, across all pages
    pub total: u64,
    /// Effective page size after clamping
    pub per_page: u64,
    /// The 1-based page that was fetched
    pub current_page: u64,
    /// Number of the final page, never below 1
    pub last_page: u64,
}

impl<T> Page<T> {
    /// Assemble the envelope. `pages` is the raw page count from the
    /// paginator; an empty result still reports a last page of 1.
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, bounds: PageBounds, pages: u64) -> Self {
        Self {
            data,
            total,
            per_page: bounds.per_page,
            current_page: bounds.page,
            last_page: pages.max(1),
        }
    }
}
