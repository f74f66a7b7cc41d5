use super::*;
use crate::domain::{PaginationMeta, SortOrder};

#[test]
fn decodes_catalog_page_with_numeric_and_string_ids() {
    let raw = r#"{
        "data": [
            {"id": 42, "name": "Trail Runner", "price": 89.5, "comparePrice": 120,
             "images": ["a.jpg"], "discountPercentage": 25},
            {"_id": "sku-7", "name": "Sandal", "price": 19.99}
        ],
        "pagination": {"page": 2, "totalPages": 4, "totalItems": 37, "hasPrev": true, "hasNext": true}
    }"#;

    let page: CatalogPage = serde_json::from_str(raw).expect("decode page");

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].id, ProductId("42".to_string()));
    assert_eq!(page.data[0].compare_price, Some(120.0));
    assert_eq!(page.data[1].id, ProductId("sku-7".to_string()));
    assert!(page.data[1].images.is_empty());
    assert_eq!(page.data[1].discount_percentage, None);
    assert_eq!(page.pagination.total_items, 37);
}

#[test]
fn pagination_meta_ignores_server_supplied_flags() {
    let payload = PaginationPayload {
        page: 1,
        total_pages: 1,
        total_items: 3,
        has_prev: true,
        has_next: true,
    };

    let meta = PaginationMeta::from(payload);

    assert!(!meta.has_prev());
    assert!(!meta.has_next());
}

#[test]
fn category_list_accepts_wrapped_and_bare_shapes() {
    let wrapped: CategoryListPayload =
        serde_json::from_str(r#"{"data":[{"slug":"shoes","name":"Shoes"}]}"#).expect("wrapped");
    let bare: CategoryListPayload =
        serde_json::from_str(r#"[{"slug":"bags"}]"#).expect("bare");

    assert_eq!(wrapped.into_categories()[0].slug, "shoes");
    let bare = bare.into_categories();
    assert_eq!(bare[0].slug, "bags");
    assert_eq!(bare[0].name, "");
}

#[test]
fn sort_order_parses_only_known_wire_names() {
    assert_eq!(SortOrder::parse("price-low"), Some(SortOrder::PriceLow));
    assert_eq!(SortOrder::parse(" popular "), Some(SortOrder::Popular));
    assert_eq!(SortOrder::parse("cheapest"), None);
    assert_eq!(SortOrder::parse("Price-Low"), None);
    assert!(SortOrder::default().is_default());
}
