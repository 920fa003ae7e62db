//! WooCommerce page-number pagination.
//!
//! The REST API pages with `page`/`per_page` query parameters and reports the
//! page count in the `X-WP-TotalPages` response header:
//!
//! ```text
//! X-WP-Total: 37
//! X-WP-TotalPages: 4
//! ```

pub const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// Parses the `X-WP-TotalPages` header value.
///
/// Returns `None` if the header is absent or not a non-negative integer.
#[must_use]
pub fn parse_total_pages(header: Option<&str>) -> Option<u32> {
    header?.trim().parse::<u32>().ok()
}

/// Decides whether another page should be requested after `page` returned
/// `returned` items.
///
/// Without a `X-WP-TotalPages` header, a short page marks the end.
#[must_use]
pub fn has_next_page(page: u32, total_pages: Option<u32>, returned: usize, per_page: u32) -> bool {
    match total_pages {
        Some(total) => page < total,
        None => returned >= per_page as usize && returned > 0,
    }
}
