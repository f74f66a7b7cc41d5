use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocol::PaginationPayload;

/// Catalog product identifier. The catalog emits either numeric or string ids;
/// both are kept as their decimal/string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawProductId")]
pub struct ProductId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Number(i64),
    Text(String),
}

impl From<RawProductId> for ProductId {
    fn from(value: RawProductId) -> Self {
        match value {
            RawProductId::Number(id) => Self(id.to_string()),
            RawProductId::Text(id) => Self(id),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    Rating,
    Popular,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Newest,
        SortOrder::PriceLow,
        SortOrder::PriceHigh,
        SortOrder::Rating,
        SortOrder::Popular,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::PriceLow => "price-low",
            SortOrder::PriceHigh => "price-high",
            SortOrder::Rating => "rating",
            SortOrder::Popular => "popular",
        }
    }

    /// Parses the wire/URL form. Unknown values yield `None`; callers fall back
    /// to the default order.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|order| order.as_str() == raw)
    }

    pub fn is_default(self) -> bool {
        self == SortOrder::default()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page-navigation state derived from one accepted catalog response.
///
/// `has_prev` and `has_next` are always recomputed from `page` and
/// `total_pages`; there is no way to set them independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMeta {
    page: u32,
    total_pages: u32,
    total_items: u64,
}

impl PaginationMeta {
    pub fn new(page: u32, total_pages: u32, total_items: u64) -> Self {
        Self {
            page: page.max(1),
            total_pages,
            total_items,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl From<PaginationPayload> for PaginationMeta {
    fn from(value: PaginationPayload) -> Self {
        Self::new(value.page, value.total_pages, value.total_items)
    }
}
