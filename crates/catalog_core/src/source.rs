use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::CatalogError,
    protocol::{CatalogPage, Category, CategoryListPayload},
};
use tracing::debug;

use crate::query::CatalogQuery;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The remote catalog. Ranking and relevance are its business; the browse
/// view only sends parameters and reads pages back.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError>;
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError>;
}

pub struct HttpCatalogSource {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCatalogSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(Client::new(), base_url, timeout)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_error(&self, err: reqwest::Error) -> CatalogError {
        if err.is_timeout() {
            CatalogError::Timeout(self.timeout)
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Status {
                status: status.as_u16(),
            }
        } else {
            CatalogError::Transport(err.to_string())
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, params = query.len(), "catalog: sending request");
        let res = self
            .http
            .get(&url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| self.map_error(err))?;
        let status = res.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }
        res.json::<T>().await.map_err(|err| self.map_error(err))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_products(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        self.get_json("/products", &query.to_pairs()).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let payload: CategoryListPayload = self.get_json("/categories", &[]).await?;
        Ok(payload.into_categories())
    }
}
