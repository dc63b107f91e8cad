use crate::domain::entry::CatalogEntry;
use crate::error::FetchError;

/// Lifecycle of a single-entry lookup. Unlike the search machine there is
/// nothing to retain between phases, so the union carries everything.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading { id: u64 },
    Found(CatalogEntry),
    NotFound { message: String },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailEvent {
    Loaded(CatalogEntry),
    Errored(FetchError),
}

impl DetailState {
    pub fn apply(self, event: DetailEvent) -> DetailState {
        match event {
            DetailEvent::Loaded(entry) => DetailState::Found(entry),
            DetailEvent::Errored(err) => match err {
                FetchError::Cancelled => self,
                FetchError::NotFound { .. } => DetailState::NotFound {
                    message: err.to_string(),
                },
                other => DetailState::Error {
                    message: other.to_string(),
                },
            },
        }
    }
}
