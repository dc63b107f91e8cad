use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use aniscope_core::domain::detail::{DetailEvent, DetailState};
use aniscope_core::domain::entry::CatalogEntry;
use aniscope_core::domain::provider::CatalogProvider;
use aniscope_core::error::FetchError;

use crate::coordinator::Outcome;

/// Single-item lookup, independent of the search machine but guarded the
/// same way: one generation counter, one in-flight task, stale outcomes
/// discarded. `state` is `None` whenever the detail view is closed.
pub struct DetailLookup {
    provider: Arc<dyn CatalogProvider>,
    outcomes: UnboundedSender<Outcome>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    state: Option<DetailState>,
}

impl DetailLookup {
    pub fn new(provider: Arc<dyn CatalogProvider>, outcomes: UnboundedSender<Outcome>) -> Self {
        DetailLookup {
            provider,
            outcomes,
            generation: 0,
            in_flight: None,
            state: None,
        }
    }

    pub fn state(&self) -> Option<&DetailState> {
        self.state.as_ref()
    }

    /// Starts (or restarts, on id change) the lookup for `id`, superseding
    /// any fetch still in flight.
    pub fn open(&mut self, id: u64) {
        self.invalidate();
        let generation = self.generation;
        debug!(id, generation, "detail lookup dispatched");

        let provider = Arc::clone(&self.provider);
        let outcomes = self.outcomes.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = provider.lookup(id).await;
            let _ = outcomes.send(Outcome::Detail { generation, result });
        }));

        self.state = Some(DetailState::Loading { id });
    }

    /// Navigation away: cancel whatever is in flight and drop the view
    /// state. The search state lives elsewhere and is untouched.
    pub fn close(&mut self) {
        self.invalidate();
        self.state = None;
    }

    pub fn on_outcome(&mut self, generation: u64, result: Result<CatalogEntry, FetchError>) {
        if generation != self.generation {
            debug!(generation, live = self.generation, "stale detail outcome discarded");
            return;
        }
        let Some(state) = self.state.take() else {
            return;
        };
        self.in_flight = None;
        self.state = Some(match result {
            Ok(entry) => state.apply(DetailEvent::Loaded(entry)),
            Err(err) if err.is_cancelled() => state,
            Err(err) => {
                warn!(error = %err, "detail lookup failed");
                state.apply(DetailEvent::Errored(err))
            }
        });
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for DetailLookup {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::Duration;

    use super::DetailLookup;
    use crate::coordinator::Outcome;
    use aniscope_core::domain::detail::DetailState;
    use aniscope_core::domain::entry::CatalogEntry;
    use aniscope_core::domain::page::ResultPage;
    use aniscope_core::domain::provider::CatalogProvider;
    use aniscope_core::error::FetchError;

    struct ScriptedLookup {
        delay: Duration,
        responses: Mutex<Vec<(u64, Result<CatalogEntry, FetchError>)>>,
    }

    impl ScriptedLookup {
        fn new(delay: Duration) -> Self {
            ScriptedLookup {
                delay,
                responses: Mutex::new(Vec::new()),
            }
        }

        fn respond_for(&self, id: u64, response: Result<CatalogEntry, FetchError>) {
            self.responses.lock().unwrap().push((id, response));
        }
    }

    #[async_trait]
    impl CatalogProvider for ScriptedLookup {
        async fn search(&self, _query: &str, _page: u32) -> Result<ResultPage, FetchError> {
            Ok(ResultPage::empty())
        }

        async fn lookup(&self, id: u64) -> Result<CatalogEntry, FetchError> {
            tokio::time::sleep(self.delay).await;
            let mut responses = self.responses.lock().unwrap();
            match responses.iter().position(|(want, _)| *want == id) {
                Some(index) => responses.remove(index).1,
                None => Err(FetchError::NotFound { id }),
            }
        }
    }

    fn entry(id: u64) -> CatalogEntry {
        CatalogEntry {
            id,
            title: format!("entry {id}"),
            poster_url: String::new(),
            synopsis: None,
            score: None,
            episodes: None,
            aired_from: None,
        }
    }

    fn lookup(provider: &Arc<ScriptedLookup>) -> (DetailLookup, UnboundedReceiver<Outcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider: Arc<dyn CatalogProvider> = provider.clone();
        (DetailLookup::new(provider, tx), rx)
    }

    async fn settle(detail: &mut DetailLookup, rx: &mut UnboundedReceiver<Outcome>) {
        match rx.recv().await.expect("outcome") {
            Outcome::Detail { generation, result } => detail.on_outcome(generation, result),
            Outcome::Search { .. } => panic!("unexpected search outcome"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn open_loads_the_entry() {
        let provider = Arc::new(ScriptedLookup::new(Duration::ZERO));
        provider.respond_for(19, Ok(entry(19)));
        let (mut detail, mut rx) = lookup(&provider);

        detail.open(19);
        assert_eq!(detail.state(), Some(&DetailState::Loading { id: 19 }));

        settle(&mut detail, &mut rx).await;
        assert!(matches!(detail.state(), Some(DetailState::Found(e)) if e.id == 19));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_entry_reports_not_found_with_the_id() {
        let provider = Arc::new(ScriptedLookup::new(Duration::ZERO));
        let (mut detail, mut rx) = lookup(&provider);

        detail.open(4242);
        settle(&mut detail, &mut rx).await;

        match detail.state() {
            Some(DetailState::NotFound { message }) => assert!(message.contains("4242")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn id_change_supersedes_the_first_lookup() {
        let provider = Arc::new(ScriptedLookup::new(Duration::from_millis(50)));
        provider.respond_for(1, Ok(entry(1)));
        provider.respond_for(2, Ok(entry(2)));
        let (mut detail, mut rx) = lookup(&provider);

        detail.open(1);
        detail.open(2);
        settle(&mut detail, &mut rx).await;
        assert!(matches!(detail.state(), Some(DetailState::Found(e)) if e.id == 2));

        // A late success for the first id is stale and must be discarded.
        detail.on_outcome(1, Ok(entry(1)));
        assert!(matches!(detail.state(), Some(DetailState::Found(e)) if e.id == 2));
    }

    #[tokio::test(start_paused = true)]
    async fn close_discards_any_later_outcome() {
        let provider = Arc::new(ScriptedLookup::new(Duration::from_millis(50)));
        provider.respond_for(7, Ok(entry(7)));
        let (mut detail, _rx) = lookup(&provider);

        detail.open(7);
        detail.close();
        assert_eq!(detail.state(), None);

        detail.on_outcome(1, Ok(entry(7)));
        assert_eq!(detail.state(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_is_silent() {
        let provider = Arc::new(ScriptedLookup::new(Duration::ZERO));
        let (mut detail, _rx) = lookup(&provider);

        detail.open(7);
        detail.on_outcome(1, Err(FetchError::Cancelled));
        assert_eq!(detail.state(), Some(&DetailState::Loading { id: 7 }));
    }
}
