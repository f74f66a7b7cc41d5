//! Text rendering of the visible catalog state.
//!
//! Pure functions of a [`CatalogView`]; nothing here reads or changes browse
//! state.

use std::fmt::Write as _;

use shared::{domain::PaginationMeta, protocol::ProductSummary};

use crate::{
    browser::{CatalogView, FetchFailure},
    pagination::{page_window, DEFAULT_PAGE_WINDOW},
};

pub fn render(view: &CatalogView) -> String {
    let mut out = String::new();

    if let Some(failure) = &view.error {
        let _ = writeln!(out, "{}", render_failure_banner(failure));
    }

    let Some(results) = view.results.as_deref() else {
        let _ = writeln!(out, "{}", if view.loading { "Loading products..." } else { "No results yet." });
        return out;
    };

    let _ = writeln!(out, "{}", render_summary(&results.pagination, results.products.len()));
    if view.loading {
        let _ = writeln!(out, "(updating...)");
    }
    if results.products.is_empty() {
        let _ = writeln!(out, "No products match these filters.");
    }
    for product in &results.products {
        let _ = writeln!(out, "  {}", render_product(product));
    }
    let _ = writeln!(out, "{}", render_page_controls(&results.pagination));
    out
}

pub fn render_product(product: &ProductSummary) -> String {
    let mut line = format!("{}  {}", product.name, format_price(product.price));
    if let Some(compare) = product.compare_price.filter(|compare| *compare > product.price) {
        let _ = write!(line, "  (was {})", format_price(compare));
    }
    if let Some(discount) = product.discount_percentage.filter(|discount| *discount > 0.0) {
        let _ = write!(line, "  -{}%", discount.round());
    }
    match product.images.len() {
        0 => {}
        1 => line.push_str("  [1 image]"),
        n => {
            let _ = write!(line, "  [{n} images]");
        }
    }
    line
}

pub fn render_summary(meta: &PaginationMeta, shown: usize) -> String {
    format!(
        "Showing {shown} of {} products - page {} of {}",
        meta.total_items(),
        meta.page(),
        meta.total_pages().max(1)
    )
}

/// `< prev | 1 [2] 3 | next >`, with the prev/next ends dropped when there is
/// nowhere to go.
pub fn render_page_controls(meta: &PaginationMeta) -> String {
    let pages = page_window(meta, DEFAULT_PAGE_WINDOW)
        .map(|page| {
            if page == meta.page() {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let prev = if meta.has_prev() { "< prev" } else { "      " };
    let next = if meta.has_next() { "next >" } else { "" };
    format!("{prev} | {pages} | {next}").trim_end().to_string()
}

pub fn render_failure_banner(failure: &FetchFailure) -> String {
    format!(
        "! Could not refresh results ({}). Showing the last results; retry to try again.",
        failure.message
    )
}

pub fn format_price(amount: f64) -> String {
    format!("{amount:.2}")
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
