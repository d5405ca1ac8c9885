//! Window pagination arithmetic
//!
//! Callers present listings in logical pages of `max_page_window` upstream
//! pages. Navigation must always land on a window boundary, so the total
//! page count is rounded up to the next window multiple, and next/previous
//! wrap around at the ends.

/// Total logical pages for a listing, rounded up to a window boundary
/// when `window > 1`.
pub fn logical_page_count(total_items: u32, page_size: u32, window: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(page_size);
    if window > 1 && !pages.is_multiple_of(window) {
        pages + window - pages % window
    } else {
        pages
    }
}

/// Start page of the previous window; wraps to the last window when
/// already at the first.
pub fn previous_page(current: u32, total_pages: u32, window: u32) -> u32 {
    if current == 1 {
        total_pages.saturating_sub(window) + 1
    } else {
        current.saturating_sub(window).max(1)
    }
}

/// Start page of the next window; wraps to the first page from the last
/// window.
pub fn next_page(current: u32, total_pages: u32, window: u32) -> u32 {
    if current == total_pages.saturating_sub(window) + 1 {
        1
    } else {
        current + window
    }
}
