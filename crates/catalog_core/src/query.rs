use shared::domain::SortOrder;

use crate::filter_state::{canonical_decimal, FilterCriteria, FilterField};

/// Request parameters for `GET /products`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<u8>,
    pub brand: Option<String>,
    pub sort: SortOrder,
    pub page: u32,
    pub limit: Option<u32>,
}

impl CatalogQuery {
    /// Wire pairs in canonical order. `sort` and `page` are always sent because
    /// the catalog's own defaults may differ from ours.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(8);
        if let Some(category) = &self.category {
            pairs.push((FilterField::Category.key(), category.clone()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push((FilterField::MinPrice.key(), canonical_decimal(min_price)));
        }
        if let Some(max_price) = self.max_price {
            pairs.push((FilterField::MaxPrice.key(), canonical_decimal(max_price)));
        }
        if let Some(min_rating) = self.min_rating {
            pairs.push((FilterField::MinRating.key(), min_rating.to_string()));
        }
        if let Some(brand) = &self.brand {
            pairs.push((FilterField::Brand.key(), brand.clone()));
        }
        pairs.push((FilterField::Sort.key(), self.sort.as_str().to_string()));
        pairs.push((FilterField::Page.key(), self.page.to_string()));
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryComposer {
    page_size: Option<u32>,
}

impl QueryComposer {
    pub fn new(page_size: Option<u32>) -> Self {
        Self {
            page_size: page_size.filter(|size| *size > 0),
        }
    }

    /// Builds the outgoing request. The min/max price swap happens here, so the
    /// criteria (and the URL) keep what the user entered.
    pub fn compose(&self, criteria: &FilterCriteria) -> CatalogQuery {
        let criteria = criteria.normalized();
        CatalogQuery {
            category: criteria.category().map(str::to_string),
            min_price: criteria.min_price(),
            max_price: criteria.max_price(),
            min_rating: criteria.min_rating(),
            brand: criteria.brand().map(str::to_string),
            sort: criteria.sort(),
            page: criteria.page(),
            limit: self.page_size,
        }
    }
}

pub fn compose(criteria: &FilterCriteria) -> CatalogQuery {
    QueryComposer::default().compose(criteria)
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
