use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use aniscope_core::domain::entry::CatalogEntry;
use aniscope_core::domain::page::ResultPage;
use aniscope_core::domain::provider::CatalogProvider;
use aniscope_core::error::FetchError;

use crate::catalog::wire::{parse_detail_body, parse_search_body};

pub const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Fixed number of entries requested per page; part of the remote contract,
/// not configuration.
pub const PAGE_SIZE: u32 = 12;

/// HTTP client for the remote catalog. Cheap to clone; the inner
/// `reqwest::Client` is shared.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        CatalogClient { http, base_url }
    }

    async fn fetch_text(&self, url: reqwest::Url) -> Result<(StatusCode, String), FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok((status, body))
    }

    fn search_url(&self, query: &str, page: u32) -> Result<reqwest::Url, FetchError> {
        let mut url = reqwest::Url::parse(&format!("{}/anime", self.base_url))
            .map_err(|err| FetchError::Network(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page", &page.to_string())
            .append_pair("limit", &PAGE_SIZE.to_string());
        Ok(url)
    }

    fn detail_url(&self, id: u64) -> Result<reqwest::Url, FetchError> {
        reqwest::Url::parse(&format!("{}/anime/{id}", self.base_url))
            .map_err(|err| FetchError::Network(err.to_string()))
    }
}

#[async_trait]
impl CatalogProvider for CatalogClient {
    async fn search(&self, query: &str, page: u32) -> Result<ResultPage, FetchError> {
        let url = self.search_url(query, page)?;
        debug!(query = %query, page, "catalog search request");
        let (status, body) = self.fetch_text(url).await?;
        if let Some(err) = status_failure(status) {
            return Err(err);
        }
        parse_search_body(&body)
    }

    async fn lookup(&self, id: u64) -> Result<CatalogEntry, FetchError> {
        let url = self.detail_url(id)?;
        debug!(id, "catalog detail request");
        let (status, body) = self.fetch_text(url).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { id });
        }
        if let Some(err) = status_failure(status) {
            return Err(err);
        }
        parse_detail_body(&body)
    }
}

/// Rate limiting is a distinguished failure; every other non-2xx collapses
/// to a generic status failure carrying the code.
fn status_failure(status: StatusCode) -> Option<FetchError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Some(FetchError::RateLimited);
    }
    if !status.is_success() {
        return Some(FetchError::Status(status.as_u16()));
    }
    None
}
