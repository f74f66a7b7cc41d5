//! Canonical filter/sort/page selection for the browse view.
//!
//! `FilterCriteria` is an immutable value: every change goes through [`FilterCriteria::set`]
//! (or its string-level sibling [`FilterCriteria::set_field`]) and yields a new snapshot.
//! Field-specific normalization happens on the way in, so a snapshot never holds an empty
//! string, an out-of-range rating or a page below 1.

use shared::domain::SortOrder;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Category,
    MinPrice,
    MaxPrice,
    MinRating,
    Brand,
    Sort,
    Page,
}

impl FilterField {
    /// Canonical key order used for URLs and outgoing requests.
    pub const ALL: [FilterField; 7] = [
        FilterField::Category,
        FilterField::MinPrice,
        FilterField::MaxPrice,
        FilterField::MinRating,
        FilterField::Brand,
        FilterField::Sort,
        FilterField::Page,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FilterField::Category => "category",
            FilterField::MinPrice => "minPrice",
            FilterField::MaxPrice => "maxPrice",
            FilterField::MinRating => "minRating",
            FilterField::Brand => "brand",
            FilterField::Sort => "sort",
            FilterField::Page => "page",
        }
    }

    /// Exact URL key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Lenient lookup for UI callers: accepts the URL key as well as the
    /// snake_case field name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::from_key(name).or(match name {
            "min_price" => Some(FilterField::MinPrice),
            "max_price" => Some(FilterField::MaxPrice),
            "min_rating" => Some(FilterField::MinRating),
            _ => None,
        })
    }
}

/// A single typed change to a `FilterCriteria`. `None` clears the field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Category(Option<String>),
    MinPrice(Option<f64>),
    MaxPrice(Option<f64>),
    MinRating(Option<i64>),
    Brand(Option<String>),
    Sort(SortOrder),
    Page(i64),
}

impl FilterUpdate {
    pub fn field(&self) -> FilterField {
        match self {
            FilterUpdate::Category(_) => FilterField::Category,
            FilterUpdate::MinPrice(_) => FilterField::MinPrice,
            FilterUpdate::MaxPrice(_) => FilterField::MaxPrice,
            FilterUpdate::MinRating(_) => FilterField::MinRating,
            FilterUpdate::Brand(_) => FilterField::Brand,
            FilterUpdate::Sort(_) => FilterField::Sort,
            FilterUpdate::Page(_) => FilterField::Page,
        }
    }

    /// The update that puts `field` back to its default.
    pub fn reset(field: FilterField) -> Self {
        match field {
            FilterField::Category => FilterUpdate::Category(None),
            FilterField::MinPrice => FilterUpdate::MinPrice(None),
            FilterField::MaxPrice => FilterUpdate::MaxPrice(None),
            FilterField::MinRating => FilterUpdate::MinRating(None),
            FilterField::Brand => FilterUpdate::Brand(None),
            FilterField::Sort => FilterUpdate::Sort(SortOrder::default()),
            FilterField::Page => FilterUpdate::Page(1),
        }
    }

    /// Coerces a raw string value for `field`. An empty value is a reset;
    /// a value that fails coercion yields `None`.
    pub fn parse(field: FilterField, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(Self::reset(field));
        }
        match field {
            FilterField::Category => normalize_category(raw).map(|c| FilterUpdate::Category(Some(c))),
            FilterField::MinPrice => parse_price(raw).map(|p| FilterUpdate::MinPrice(Some(p))),
            FilterField::MaxPrice => parse_price(raw).map(|p| FilterUpdate::MaxPrice(Some(p))),
            FilterField::MinRating => parse_rating(raw).map(|r| FilterUpdate::MinRating(Some(r.into()))),
            FilterField::Brand => Some(FilterUpdate::Brand(normalize_text(raw))),
            FilterField::Sort => SortOrder::parse(raw).map(FilterUpdate::Sort),
            FilterField::Page => parse_page(raw).map(FilterUpdate::Page),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    min_rating: Option<u8>,
    brand: Option<String>,
    sort: SortOrder,
    page: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            category: None,
            min_price: None,
            max_price: None,
            min_rating: None,
            brand: None,
            sort: SortOrder::default(),
            page: 1,
        }
    }
}

impl FilterCriteria {
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    pub fn min_rating(&self) -> Option<u8> {
        self.min_rating
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Returns a new snapshot with `update` applied. Changing anything other
    /// than the page sends the user back to page 1.
    pub fn set(&self, update: FilterUpdate) -> Self {
        let resets_page = update.field() != FilterField::Page;
        let mut next = self.with_update(update);
        if resets_page && next != *self {
            next.page = 1;
        }
        next
    }

    /// String-level entry point for form inputs. Unknown field names leave the
    /// snapshot unchanged; values that fail coercion reset the field.
    pub fn set_field(&self, field: &str, value: &str) -> Self {
        let Some(field) = FilterField::parse(field) else {
            debug!(field, "filters: ignoring unknown filter field");
            return self.clone();
        };
        let update = FilterUpdate::parse(field, value).unwrap_or_else(|| {
            debug!(field = field.key(), value, "filters: value failed coercion, resetting field");
            FilterUpdate::reset(field)
        });
        self.set(update)
    }

    pub fn clear(&self) -> Self {
        Self::default()
    }

    /// The form sent to the catalog: an inverted price range is swapped.
    pub fn normalized(&self) -> Self {
        let mut next = self.clone();
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                next.min_price = Some(max);
                next.max_price = Some(min);
            }
        }
        next
    }

    /// Applies one update without the page reset. Used when rebuilding a
    /// snapshot from a URL, where fields arrive in arbitrary order.
    pub(crate) fn with_update(&self, update: FilterUpdate) -> Self {
        let mut next = self.clone();
        match update {
            FilterUpdate::Category(value) => {
                next.category = value.as_deref().and_then(normalize_category);
            }
            FilterUpdate::MinPrice(value) => next.min_price = value.and_then(normalize_price),
            FilterUpdate::MaxPrice(value) => next.max_price = value.and_then(normalize_price),
            FilterUpdate::MinRating(value) => next.min_rating = value.and_then(normalize_rating),
            FilterUpdate::Brand(value) => next.brand = value.as_deref().and_then(normalize_text),
            FilterUpdate::Sort(order) => next.sort = order,
            FilterUpdate::Page(page) => next.page = clamp_page_number(page),
        }
        next
    }
}

fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Slug-shaped values pass through untouched, whether or not the catalog
/// knows them. Anything else is treated as absent.
fn normalize_category(raw: &str) -> Option<String> {
    let slug = normalize_text(raw)?;
    slug.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        .then_some(slug)
}

fn normalize_price(value: f64) -> Option<f64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // -0.0 would otherwise encode as "-0"
    Some(if value == 0.0 { 0.0 } else { value })
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().and_then(normalize_price)
}

fn normalize_rating(value: i64) -> Option<u8> {
    (1..=5).contains(&value).then_some(value as u8)
}

fn parse_rating(raw: &str) -> Option<u8> {
    raw.parse::<i64>().ok().and_then(normalize_rating)
}

/// Integer page numbers too long for `i64` saturate instead of failing.
fn parse_page(raw: &str) -> Option<i64> {
    if let Ok(page) = raw.parse::<i64>() {
        return Some(page);
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

fn clamp_page_number(page: i64) -> u32 {
    page.clamp(1, i64::from(u32::MAX)) as u32
}

/// Shortest decimal form that parses back to the same value (`100`, `19.99`).
pub(crate) fn canonical_decimal(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
#[path = "tests/filter_state_tests.rs"]
mod tests;
