use thiserror::Error;

/// Outcome kinds a catalog request can fail with. Every transport-level
/// failure is converted into one of these at the client boundary; the state
/// machines never see a raw transport error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request was superseded or torn down. Never surfaced to the user.
    #[error("request cancelled")]
    Cancelled,
    #[error("you are being rate-limited; please wait a moment before searching again")]
    RateLimited,
    #[error("no entry found with id {id}; it may have been removed or the id is incorrect")]
    NotFound { id: u64 },
    #[error("malformed catalog response: {0}")]
    Malformed(String),
    #[error("unexpected response status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
