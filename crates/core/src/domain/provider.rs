use async_trait::async_trait;

use crate::domain::entry::CatalogEntry;
use crate::domain::page::ResultPage;
use crate::error::FetchError;

/// Port for the remote catalog. The infra crate implements this over HTTP;
/// coordinator tests implement it with scripted responses.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Full-text search, one page at a time. `page` is 1-based.
    async fn search(&self, query: &str, page: u32) -> Result<ResultPage, FetchError>;

    /// Fetch a single entry by id.
    async fn lookup(&self, id: u64) -> Result<CatalogEntry, FetchError>;
}
