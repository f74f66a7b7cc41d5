use serde::{Deserialize, Serialize};

use crate::domain::ProductId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
}

/// Pagination block as sent by the catalog. The `has_*` flags are carried for
/// completeness only; `PaginationMeta` recomputes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationPayload {
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub data: Vec<ProductSummary>,
    pub pagination: PaginationPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

/// `GET /categories` answers either `{ "data": [...] }` or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryListPayload {
    Wrapped { data: Vec<Category> },
    Bare(Vec<Category>),
}

impl CategoryListPayload {
    pub fn into_categories(self) -> Vec<Category> {
        match self {
            CategoryListPayload::Wrapped { data } => data,
            CategoryListPayload::Bare(data) => data,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
