use super::*;
use crate::{browser::CatalogResults, filter_state::FilterCriteria};
use shared::{domain::ProductId, error::FailureKind};
use std::sync::Arc;

fn product(name: &str, price: f64) -> ProductSummary {
    ProductSummary {
        id: ProductId(name.to_lowercase()),
        name: name.to_string(),
        price,
        compare_price: None,
        images: Vec::new(),
        discount_percentage: None,
    }
}

fn view_with(products: Vec<ProductSummary>, meta: PaginationMeta) -> CatalogView {
    CatalogView {
        results: Some(Arc::new(CatalogResults {
            seq: 1,
            criteria: Arc::new(FilterCriteria::default()),
            products,
            pagination: meta,
        })),
        loading: false,
        error: None,
    }
}

#[test]
fn product_line_shows_compare_price_discount_and_images() {
    let mut runner = product("Trail Runner", 89.5);
    runner.compare_price = Some(120.0);
    runner.discount_percentage = Some(25.4);
    runner.images = vec!["a.jpg".to_string(), "b.jpg".to_string()];

    assert_eq!(
        render_product(&runner),
        "Trail Runner  89.50  (was 120.00)  -25%  [2 images]"
    );
}

#[test]
fn compare_price_not_above_price_is_hidden() {
    let mut sandal = product("Sandal", 20.0);
    sandal.compare_price = Some(20.0);

    assert_eq!(render_product(&sandal), "Sandal  20.00");
}

#[test]
fn page_controls_mark_current_page_and_hide_unavailable_ends() {
    assert_eq!(
        render_page_controls(&PaginationMeta::new(2, 3, 30)),
        "< prev | 1 [2] 3 | next >"
    );
    assert_eq!(
        render_page_controls(&PaginationMeta::new(1, 1, 4)),
        "       | [1] |"
    );
}

#[test]
fn page_controls_near_the_largest_page_number() {
    let controls = render_page_controls(&PaginationMeta::new(u32::MAX - 1, u32::MAX, 1));

    assert!(controls.starts_with("< prev | "));
    assert!(controls.contains(&format!("[{}] {} | next >", u32::MAX - 1, u32::MAX)));
}

#[test]
fn renders_results_with_summary_and_controls() {
    let view = view_with(
        vec![product("Boot", 99.0), product("Clog", 45.0)],
        PaginationMeta::new(1, 2, 4),
    );

    let rendered = render(&view);

    assert!(rendered.starts_with("Showing 2 of 4 products - page 1 of 2\n"));
    assert!(rendered.contains("  Boot  99.00\n"));
    assert!(rendered.contains("  Clog  45.00\n"));
    assert!(rendered.ends_with("| [1] 2 | next >\n"));
}

#[test]
fn renders_empty_state_and_failure_banner_over_stale_results() {
    let mut view = view_with(Vec::new(), PaginationMeta::new(1, 0, 0));
    view.error = Some(FetchFailure {
        seq: 4,
        kind: FailureKind::Timeout,
        message: "catalog request timed out after 10s".to_string(),
    });

    let rendered = render(&view);

    assert!(rendered.starts_with("! Could not refresh results (catalog request timed out after 10s)."));
    assert!(rendered.contains("No products match these filters."));
}

#[test]
fn renders_loading_before_first_results() {
    let view = CatalogView {
        loading: true,
        ..CatalogView::default()
    };

    assert_eq!(render(&view), "Loading products...\n");
}
