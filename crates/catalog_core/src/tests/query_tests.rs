use super::*;
use crate::filter_state::FilterUpdate;

#[test]
fn inverted_price_range_is_swapped_on_the_way_out() {
    let criteria = FilterCriteria::default()
        .set(FilterUpdate::MinPrice(Some(80.0)))
        .set(FilterUpdate::MaxPrice(Some(20.0)));

    let query = compose(&criteria);

    assert_eq!(query.min_price, Some(20.0));
    assert_eq!(query.max_price, Some(80.0));
    assert_eq!(criteria.min_price(), Some(80.0));
}

#[test]
fn default_criteria_still_send_sort_and_page() {
    let query = compose(&FilterCriteria::default());

    assert_eq!(
        query.to_pairs(),
        vec![("sort", "newest".to_string()), ("page", "1".to_string())]
    );
}

#[test]
fn pairs_follow_canonical_order_and_omit_absent_fields() {
    let criteria = FilterCriteria::default()
        .set_field("brand", "acme")
        .set_field("minRating", "4")
        .set_field("category", "shoes")
        .set_field("maxPrice", "99.5");

    let pairs = compose(&criteria).to_pairs();

    assert_eq!(
        pairs,
        vec![
            ("category", "shoes".to_string()),
            ("maxPrice", "99.5".to_string()),
            ("minRating", "4".to_string()),
            ("brand", "acme".to_string()),
            ("sort", "newest".to_string()),
            ("page", "1".to_string()),
        ]
    );
}

#[test]
fn configured_page_size_is_forwarded_as_limit() {
    let composer = QueryComposer::new(Some(24));

    let query = composer.compose(&FilterCriteria::default().set_field("page", "3"));

    assert_eq!(query.limit, Some(24));
    assert_eq!(query.to_pairs().last(), Some(&("limit", "24".to_string())));
    assert_eq!(QueryComposer::new(Some(0)).compose(&FilterCriteria::default()).limit, None);
}
