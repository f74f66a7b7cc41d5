//! Mapping between `FilterCriteria` and the shareable query string.
//!
//! Only non-default fields are emitted, always in the fixed key order of
//! [`FilterField::ALL`], so two equal snapshots always produce the same URL.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::debug;
use url::form_urlencoded;

use crate::filter_state::{canonical_decimal, FilterCriteria, FilterField, FilterUpdate};
use crate::history::NavigationHistory;

/// How a filter change is written to navigation history. One policy applies
/// to every change made through a browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPolicy {
    /// New history entry per filter view; each one is back-navigable.
    #[default]
    Push,
    /// Overwrite the current entry. Suits high-frequency inputs such as a price slider.
    Replace,
}

impl NavigationPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "push" => Some(NavigationPolicy::Push),
            "replace" => Some(NavigationPolicy::Replace),
            _ => None,
        }
    }

    pub fn apply(self, history: &dyn NavigationHistory, query: &str) {
        match self {
            NavigationPolicy::Push => history.push(query),
            NavigationPolicy::Replace => history.replace(query),
        }
    }
}

/// Non-default fields as `(key, value)` pairs in canonical order.
pub fn canonical_pairs(criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(category) = criteria.category() {
        pairs.push((FilterField::Category.key(), category.to_string()));
    }
    if let Some(min_price) = criteria.min_price() {
        pairs.push((FilterField::MinPrice.key(), canonical_decimal(min_price)));
    }
    if let Some(max_price) = criteria.max_price() {
        pairs.push((FilterField::MaxPrice.key(), canonical_decimal(max_price)));
    }
    if let Some(min_rating) = criteria.min_rating() {
        pairs.push((FilterField::MinRating.key(), min_rating.to_string()));
    }
    if let Some(brand) = criteria.brand() {
        pairs.push((FilterField::Brand.key(), brand.to_string()));
    }
    if !criteria.sort().is_default() {
        pairs.push((FilterField::Sort.key(), criteria.sort().as_str().to_string()));
    }
    if criteria.page() > 1 {
        pairs.push((FilterField::Page.key(), criteria.page().to_string()));
    }
    pairs
}

/// Encodes without a leading `?`. The default snapshot encodes to `""`.
pub fn encode(criteria: &FilterCriteria) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in canonical_pairs(criteria) {
        serializer.append_pair(key, &value);
    }
    serializer.finish()
}

/// Like [`encode`], but keeps parameters of `current` that are not filter
/// keys (tracking tags and the like), after the canonical ones.
pub fn encode_preserving(criteria: &FilterCriteria, current: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in canonical_pairs(criteria) {
        serializer.append_pair(key, &value);
    }
    for (key, value) in form_urlencoded::parse(strip_question_mark(current).as_bytes()) {
        if key.is_empty() || FilterField::from_key(&key).is_some() {
            continue;
        }
        serializer.append_pair(&key, &value);
    }
    serializer.finish()
}

/// Never fails: keys that do not coerce are treated as absent, unknown keys
/// are ignored and the first occurrence of a repeated key wins.
pub fn decode(query: &str) -> FilterCriteria {
    let mut seen = HashSet::new();
    let mut criteria = FilterCriteria::default();
    for (key, value) in form_urlencoded::parse(strip_question_mark(query).as_bytes()) {
        let Some(field) = FilterField::from_key(&key) else {
            continue;
        };
        if !seen.insert(field) {
            continue;
        }
        let update = match FilterUpdate::parse(field, &value) {
            Some(update) => update,
            None => {
                debug!(key = %key, value = %value, "url: dropping malformed filter parameter");
                FilterUpdate::reset(field)
            }
        };
        criteria = criteria.with_update(update);
    }
    criteria
}

pub(crate) fn strip_question_mark(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}

#[cfg(test)]
#[path = "tests/url_codec_tests.rs"]
mod tests;
