//! Catalog browsing core for the storefront shop view: filter state, URL
//! codec, request composition, sequenced fetch orchestration, pagination and
//! text rendering.

pub mod browser;
pub mod filter_state;
pub mod history;
pub mod pagination;
pub mod presenter;
pub mod query;
pub mod source;
pub mod url_codec;

pub use browser::{
    BrowseEvent, BrowserOptions, CatalogBrowser, CatalogResults, CatalogView, FetchFailure,
    FetchOutcome, RequestEnvelope,
};
pub use filter_state::{FilterCriteria, FilterField, FilterUpdate};
pub use history::{MemoryHistory, NavigationHistory};
pub use query::{CatalogQuery, QueryComposer};
pub use source::{CatalogSource, HttpCatalogSource, DEFAULT_REQUEST_TIMEOUT};
pub use url_codec::NavigationPolicy;
