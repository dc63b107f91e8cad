use chrono::{DateTime, Utc};

/// One record from the remote catalog. Immutable once received; owned by
/// whichever view state is currently holding it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: u64,
    pub title: String,
    pub poster_url: String,
    pub synopsis: Option<String>,
    pub score: Option<f64>,
    pub episodes: Option<u32>,
    pub aired_from: Option<DateTime<Utc>>,
}
