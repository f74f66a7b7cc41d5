use std::ops::RangeInclusive;

use shared::domain::PaginationMeta;

pub const DEFAULT_PAGE_WINDOW: u32 = 5;

/// Clamps a requested page to `[1, total_pages]` of the currently visible
/// results. Before anything has been accepted only the lower bound applies.
pub fn clamp_page(requested: i64, meta: Option<&PaginationMeta>) -> u32 {
    let upper = meta.map_or(u32::MAX, |meta| meta.total_pages().max(1));
    requested.clamp(1, i64::from(upper)) as u32
}

/// Up to `width` consecutive page numbers around the current page, shifted to
/// stay inside `[1, total_pages]`.
pub fn page_window(meta: &PaginationMeta, width: u32) -> RangeInclusive<u32> {
    let total = meta.total_pages().max(1);
    let width = width.clamp(1, total);
    let page = meta.page().min(total);
    let start = page.saturating_sub(width / 2).max(1);
    let end = start.saturating_add(width - 1).min(total);
    (end + 1 - width)..=end
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
