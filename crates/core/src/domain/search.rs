use crate::domain::page::ResultPage;
use crate::error::FetchError;

/// Where the search view currently is in its request lifecycle. Only the
/// failure message lives inside the union; everything that must survive a
/// phase change (last query, last-good page) sits beside it in
/// [`SearchState`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    Pending,
    Succeeded,
    Failed { message: String },
}

/// The single session-wide search record. Mutated only through
/// [`SearchState::apply`]; the coordinator decides *whether* an event may be
/// applied (generation matching), this type decides *what* it means.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub phase: SearchPhase,
    pub last_query: String,
    pub page: ResultPage,
    pub no_results: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// A request for `query` was dispatched (fresh search or page change).
    Started { query: String },
    /// The input was cleared; drop results and return to idle.
    Cleared,
    /// The live request finished with a page of results.
    Loaded(ResultPage),
    /// The live request failed. `Cancelled` is ignored here: a cancellation
    /// is an expected consequence of superseding, not a fault.
    Errored(FetchError),
}

impl SearchState {
    pub fn new() -> Self {
        SearchState {
            phase: SearchPhase::Idle,
            last_query: String::new(),
            page: ResultPage::empty(),
            no_results: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, SearchPhase::Pending)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            SearchPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Pure transition function. The prior page is retained through
    /// `Started` and `Errored` so the view never flashes empty between a
    /// page change (or failure) and the next successful load.
    pub fn apply(self, event: SearchEvent) -> SearchState {
        match event {
            SearchEvent::Started { query } => SearchState {
                phase: SearchPhase::Pending,
                last_query: query,
                no_results: false,
                page: self.page,
            },
            SearchEvent::Cleared => SearchState::new(),
            SearchEvent::Loaded(page) => {
                let no_results = page.is_empty();
                SearchState {
                    phase: SearchPhase::Succeeded,
                    page,
                    no_results,
                    last_query: self.last_query,
                }
            }
            SearchEvent::Errored(err) => {
                if err.is_cancelled() {
                    return self;
                }
                SearchState {
                    phase: SearchPhase::Failed {
                        message: err.to_string(),
                    },
                    ..self
                }
            }
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new()
    }
}
