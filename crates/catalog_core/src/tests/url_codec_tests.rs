use super::*;
use crate::history::MemoryHistory;
use shared::domain::SortOrder;

fn shoes_page_two() -> FilterCriteria {
    FilterCriteria::default()
        .set(FilterUpdate::Category(Some("shoes".to_string())))
        .set(FilterUpdate::Sort(SortOrder::PriceLow))
        .set(FilterUpdate::Page(2))
}

#[test]
fn default_criteria_encode_to_empty_query() {
    assert_eq!(encode(&FilterCriteria::default()), "");
}

#[test]
fn encodes_in_fixed_key_order_and_decodes_back() {
    let criteria = shoes_page_two();

    let query = encode(&criteria);

    assert_eq!(query, "category=shoes&sort=price-low&page=2");
    assert_eq!(decode(&query), criteria);
}

#[test]
fn key_order_does_not_depend_on_update_order() {
    let a = FilterCriteria::default()
        .set_field("brand", "acme")
        .set_field("maxPrice", "80")
        .set_field("category", "bags");
    let b = FilterCriteria::default()
        .set_field("category", "bags")
        .set_field("brand", "acme")
        .set_field("maxPrice", "80");

    assert_eq!(encode(&a), "category=bags&maxPrice=80&brand=acme");
    assert_eq!(encode(&a), encode(&b));
}

#[test]
fn round_trip_holds_for_every_field_including_inverted_range() {
    let criteria = FilterCriteria::default()
        .set_field("category", "outdoor-gear")
        .set_field("minPrice", "100")
        .set_field("maxPrice", "49.95")
        .set_field("minRating", "4")
        .set_field("brand", "Dr. Martens & Co")
        .set_field("sort", "rating")
        .set_field("page", "12");

    let decoded = decode(&encode(&criteria));

    assert_eq!(decoded, criteria);
    assert_eq!(decoded.normalized(), criteria.normalized());
    assert_eq!(decoded.normalized().min_price(), Some(49.95));
}

#[test]
fn malformed_values_decode_as_absent_without_failing() {
    let criteria = decode("?minPrice=abc&page=-3");

    assert_eq!(criteria.min_price(), None);
    assert_eq!(criteria.page(), 1);
    assert!(criteria.is_default());
}

#[test]
fn unknown_sort_rating_and_keys_fall_back_to_defaults() {
    let criteria = decode("sort=cheapest&minRating=9&utm_source=mail&category=shoes");

    assert_eq!(criteria.sort(), SortOrder::Newest);
    assert_eq!(criteria.min_rating(), None);
    assert_eq!(criteria.category(), Some("shoes"));
}

#[test]
fn decode_keeps_page_regardless_of_parameter_order() {
    let criteria = decode("page=3&category=shoes");

    assert_eq!(criteria.page(), 3);
    assert_eq!(criteria.category(), Some("shoes"));
}

#[test]
fn first_occurrence_of_a_repeated_key_wins() {
    assert_eq!(decode("category=shoes&category=bags").category(), Some("shoes"));
}

#[test]
fn encoded_values_are_form_escaped() {
    let criteria = FilterCriteria::default().set_field("brand", "H&M Kids");

    let query = encode(&criteria);

    assert_eq!(query, "brand=H%26M+Kids");
    assert_eq!(decode(&query).brand(), Some("H&M Kids"));
}

#[test]
fn encode_preserving_keeps_foreign_parameters_after_filters() {
    let criteria = FilterCriteria::default().set_field("category", "bags");

    let query = encode_preserving(&criteria, "?utm_source=mail&category=shoes&page=4&ref=home");

    assert_eq!(query, "category=bags&utm_source=mail&ref=home");
}

#[test]
fn navigation_policy_parses_and_writes_history() {
    assert_eq!(NavigationPolicy::parse("Replace"), Some(NavigationPolicy::Replace));
    assert_eq!(NavigationPolicy::parse("append"), None);
    assert_eq!(NavigationPolicy::default(), NavigationPolicy::Push);

    let history = MemoryHistory::new("?category=shoes");
    NavigationPolicy::Push.apply(&history, "category=bags");
    NavigationPolicy::Replace.apply(&history, "category=hats");

    assert_eq!(history.entries(), vec!["category=shoes", "category=hats"]);
    assert_eq!(history.current(), "category=hats");
    assert_eq!(history.back().as_deref(), Some("category=shoes"));
    assert_eq!(history.forward().as_deref(), Some("category=hats"));
    assert_eq!(history.forward(), None);
}

#[test]
fn push_after_back_discards_forward_entries() {
    let history = MemoryHistory::new("");
    history.push("page=2");
    history.push("page=3");
    history.back();

    history.push("sort=rating");

    assert_eq!(history.entries(), vec!["", "page=2", "sort=rating"]);
}
