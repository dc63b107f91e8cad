use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use aniscope_core::domain::entry::CatalogEntry;
use aniscope_core::domain::page::ResultPage;
use aniscope_core::domain::provider::CatalogProvider;
use aniscope_core::domain::search::{SearchEvent, SearchState};
use aniscope_core::error::FetchError;

/// Queries shorter than this (after trimming) are a dead-zone: too noisy
/// for the remote service, but not empty enough to clear results.
pub const MIN_QUERY_LEN: usize = 3;

/// Completion of a spawned request task, tagged with the generation it was
/// dispatched under. Stale generations are discarded at application time.
#[derive(Debug)]
pub enum Outcome {
    Search {
        generation: u64,
        result: Result<ResultPage, FetchError>,
    },
    Detail {
        generation: u64,
        result: Result<CatalogEntry, FetchError>,
    },
}

/// Turns raw text-input events into at most one authoritative search
/// outcome per settled debounce window.
///
/// Single-flight is enforced by a generation counter: every dispatch (and
/// every clear) first invalidates the previous generation and aborts its
/// task. The abort is best-effort against the transport; the generation
/// comparison in [`SearchCoordinator::on_outcome`] is the guarantee that a
/// superseded response never mutates visible state.
pub struct SearchCoordinator {
    provider: Arc<dyn CatalogProvider>,
    outcomes: UnboundedSender<Outcome>,
    debounce: Duration,
    input: String,
    deadline: Option<Instant>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    state: SearchState,
}

impl SearchCoordinator {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        outcomes: UnboundedSender<Outcome>,
        debounce: Duration,
    ) -> Self {
        SearchCoordinator {
            provider,
            outcomes,
            debounce,
            input: String::new(),
            deadline: None,
            generation: 0,
            in_flight: None,
            state: SearchState::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// The armed debounce deadline, if any. The event loop sleeps on this.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn push_char(&mut self, ch: char) {
        let mut text = self.input.clone();
        text.push(ch);
        self.on_input_changed(text);
    }

    pub fn backspace(&mut self) {
        let mut text = self.input.clone();
        text.pop();
        self.on_input_changed(text);
    }

    /// Records the latest raw text and (re)arms the single debounce
    /// deadline, replacing any previously armed one. No request is issued
    /// here.
    pub fn on_input_changed(&mut self, text: String) {
        self.input = text;
        self.deadline = Some(Instant::now() + self.debounce);
    }

    /// The debounce window settled. Trimmed length > 2 dispatches a fresh
    /// page-1 search; length 0 cancels and clears; 1-2 characters do
    /// nothing at all.
    pub fn on_debounce_fired(&mut self) {
        self.deadline = None;
        let trimmed = self.input.trim().to_string();
        if trimmed.chars().count() >= MIN_QUERY_LEN {
            self.dispatch(trimmed, 1);
        } else if trimmed.is_empty() {
            self.invalidate();
            self.state = std::mem::take(&mut self.state).apply(SearchEvent::Cleared);
            debug!("search cleared");
        }
    }

    /// No-op unless a query has completed before and the requested page is
    /// within the current pagination bounds.
    pub fn on_page_change(&mut self, new_page: u32) {
        if self.state.last_query.is_empty() {
            return;
        }
        if new_page == 0 || new_page > self.state.page.total_pages {
            return;
        }
        let query = self.state.last_query.clone();
        self.dispatch(query, new_page);
    }

    /// Applies a completed request if and only if it is still the live
    /// generation. Cancellations are filtered out before the failure branch
    /// is ever looked at.
    pub fn on_outcome(&mut self, generation: u64, result: Result<ResultPage, FetchError>) {
        if generation != self.generation {
            debug!(generation, live = self.generation, "stale search outcome discarded");
            return;
        }
        self.in_flight = None;
        match result {
            Ok(page) => {
                self.state = std::mem::take(&mut self.state).apply(SearchEvent::Loaded(page));
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                warn!(error = %err, "search request failed");
                self.state = std::mem::take(&mut self.state).apply(SearchEvent::Errored(err));
            }
        }
    }

    fn dispatch(&mut self, query: String, page: u32) {
        self.invalidate();
        let generation = self.generation;
        debug!(query = %query, page, generation, "search dispatched");

        let provider = Arc::clone(&self.provider);
        let outcomes = self.outcomes.clone();
        let task_query = query.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = provider.search(&task_query, page).await;
            let _ = outcomes.send(Outcome::Search { generation, result });
        }));

        self.state = std::mem::take(&mut self.state).apply(SearchEvent::Started { query });
    }

    /// Invalidates the live generation and aborts the in-flight task, so
    /// anything it might still deliver can no longer match.
    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::Duration;

    use super::{Outcome, SearchCoordinator};
    use aniscope_core::domain::entry::CatalogEntry;
    use aniscope_core::domain::page::ResultPage;
    use aniscope_core::domain::provider::CatalogProvider;
    use aniscope_core::domain::search::SearchPhase;
    use aniscope_core::error::FetchError;

    struct ScriptedProvider {
        delay: Duration,
        calls: Mutex<Vec<(String, u32)>>,
        responses: Mutex<VecDeque<Result<ResultPage, FetchError>>>,
    }

    impl ScriptedProvider {
        fn new(delay: Duration) -> Self {
            ScriptedProvider {
                delay,
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(VecDeque::new()),
            }
        }

        fn respond_with(&self, response: Result<ResultPage, FetchError>) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn calls(&self) -> Vec<(String, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogProvider for ScriptedProvider {
        async fn search(&self, query: &str, page: u32) -> Result<ResultPage, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), page));
            tokio::time::sleep(self.delay).await;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ResultPage::empty()))
        }

        async fn lookup(&self, _id: u64) -> Result<CatalogEntry, FetchError> {
            Err(FetchError::Status(500))
        }
    }

    fn page_of(ids: &[u64], current: u32, total: u32) -> ResultPage {
        let entries = ids
            .iter()
            .map(|id| CatalogEntry {
                id: *id,
                title: format!("entry {id}"),
                poster_url: String::new(),
                synopsis: None,
                score: None,
                episodes: None,
                aired_from: None,
            })
            .collect();
        ResultPage {
            entries,
            current_page: current,
            total_pages: total,
            has_next: current < total,
        }
    }

    fn coordinator(
        provider: &Arc<ScriptedProvider>,
    ) -> (SearchCoordinator, UnboundedReceiver<Outcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider: Arc<dyn CatalogProvider> = provider.clone();
        (
            SearchCoordinator::new(provider, tx, Duration::from_millis(250)),
            rx,
        )
    }

    async fn settle(coord: &mut SearchCoordinator, rx: &mut UnboundedReceiver<Outcome>) {
        coord.on_debounce_fired();
        match rx.recv().await.expect("outcome") {
            Outcome::Search { generation, result } => coord.on_outcome(generation, result),
            Outcome::Detail { .. } => panic!("unexpected detail outcome"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dead_zone_queries_never_dispatch() {
        let provider = Arc::new(ScriptedProvider::new(Duration::ZERO));
        let (mut coord, _rx) = coordinator(&provider);

        coord.on_input_changed("a".to_string());
        coord.on_debounce_fired();
        coord.on_input_changed(" ab ".to_string());
        coord.on_debounce_fired();

        assert!(provider.calls().is_empty());
        assert_eq!(coord.state().phase, SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn dead_zone_keeps_existing_results() {
        let provider = Arc::new(ScriptedProvider::new(Duration::ZERO));
        provider.respond_with(Ok(page_of(&[1, 2], 1, 1)));
        let (mut coord, mut rx) = coordinator(&provider);

        coord.on_input_changed("naruto".to_string());
        settle(&mut coord, &mut rx).await;
        assert_eq!(coord.state().page.entries.len(), 2);

        coord.on_input_changed("ab".to_string());
        coord.on_debounce_fired();
        assert_eq!(coord.state().page.entries.len(), 2);
        assert_eq!(coord.state().phase, SearchPhase::Succeeded);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_query_is_trimmed_and_starts_at_page_one() {
        let provider = Arc::new(ScriptedProvider::new(Duration::ZERO));
        provider.respond_with(Ok(page_of(&[20], 1, 5)));
        let (mut coord, mut rx) = coordinator(&provider);

        coord.on_input_changed("  naruto  ".to_string());
        settle(&mut coord, &mut rx).await;

        assert_eq!(provider.calls(), vec![("naruto".to_string(), 1)]);
        assert_eq!(coord.state().phase, SearchPhase::Succeeded);
        assert_eq!(coord.state().page.total_pages, 5);
        assert_eq!(coord.state().last_query, "naruto");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_clears_without_a_request() {
        let provider = Arc::new(ScriptedProvider::new(Duration::ZERO));
        provider.respond_with(Ok(page_of(&[1], 1, 1)));
        let (mut coord, mut rx) = coordinator(&provider);

        coord.on_input_changed("naruto".to_string());
        settle(&mut coord, &mut rx).await;

        coord.on_input_changed("   ".to_string());
        coord.on_debounce_fired();

        assert_eq!(coord.state().phase, SearchPhase::Idle);
        assert!(coord.state().page.is_empty());
        assert_eq!(coord.state().last_query, "");
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_outcome_never_mutates_state() {
        let provider = Arc::new(ScriptedProvider::new(Duration::from_millis(100)));
        provider.respond_with(Ok(page_of(&[1], 1, 1)));
        provider.respond_with(Ok(page_of(&[2], 1, 1)));
        let (mut coord, mut rx) = coordinator(&provider);

        coord.on_input_changed("naruto".to_string());
        coord.on_debounce_fired();
        coord.on_input_changed("bleach".to_string());
        coord.on_debounce_fired();

        // Only the second request survives its abort window.
        match rx.recv().await.expect("outcome") {
            Outcome::Search { generation, result } => {
                assert_eq!(generation, 2);
                coord.on_outcome(generation, result);
            }
            Outcome::Detail { .. } => panic!("unexpected detail outcome"),
        }
        let settled = coord.state().clone();

        // A late delivery from the first generation must be discarded.
        coord.on_outcome(1, Ok(page_of(&[99], 7, 7)));
        assert_eq!(coord.state(), &settled);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_invalidates_the_in_flight_generation() {
        let provider = Arc::new(ScriptedProvider::new(Duration::from_millis(100)));
        let (mut coord, _rx) = coordinator(&provider);

        coord.on_input_changed("naruto".to_string());
        coord.on_debounce_fired();
        coord.on_input_changed(String::new());
        coord.on_debounce_fired();

        // The cleared path bumped the generation, so even a success that
        // slipped out before the abort landed cannot resurface.
        coord.on_outcome(1, Ok(page_of(&[1], 1, 1)));
        assert_eq!(coord.state().phase, SearchPhase::Idle);
        assert!(coord.state().page.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_never_becomes_a_failure() {
        let provider = Arc::new(ScriptedProvider::new(Duration::ZERO));
        let (mut coord, _rx) = coordinator(&provider);

        coord.on_input_changed("naruto".to_string());
        coord.on_debounce_fired();
        coord.on_outcome(1, Err(FetchError::Cancelled));

        assert_eq!(coord.state().phase, SearchPhase::Pending);
        assert!(coord.state().error_message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn page_change_respects_bounds() {
        let provider = Arc::new(ScriptedProvider::new(Duration::ZERO));
        provider.respond_with(Ok(page_of(&[1], 1, 5)));
        let (mut coord, mut rx) = coordinator(&provider);

        coord.on_input_changed("naruto".to_string());
        settle(&mut coord, &mut rx).await;

        coord.on_page_change(0);
        coord.on_page_change(6);
        assert_eq!(provider.calls().len(), 1);

        provider.respond_with(Ok(page_of(&[7], 2, 5)));
        coord.on_page_change(2);
        assert_eq!(coord.state().phase, SearchPhase::Pending);
        // Prior page stays visible until the replacement lands.
        assert_eq!(coord.state().page.current_page, 1);

        match rx.recv().await.expect("outcome") {
            Outcome::Search { generation, result } => coord.on_outcome(generation, result),
            Outcome::Detail { .. } => panic!("unexpected detail outcome"),
        }
        assert_eq!(
            provider.calls().last(),
            Some(&("naruto".to_string(), 2))
        );
        assert_eq!(coord.state().page.current_page, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn page_change_before_any_search_is_a_no_op() {
        let provider = Arc::new(ScriptedProvider::new(Duration::ZERO));
        let (mut coord, _rx) = coordinator(&provider);

        coord.on_page_change(1);
        assert!(provider.calls().is_empty());
        assert_eq!(coord.state().phase, SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_keeps_last_good_page() {
        let provider = Arc::new(ScriptedProvider::new(Duration::ZERO));
        provider.respond_with(Ok(page_of(&[1, 2], 1, 5)));
        provider.respond_with(Err(FetchError::RateLimited));
        let (mut coord, mut rx) = coordinator(&provider);

        coord.on_input_changed("naruto".to_string());
        settle(&mut coord, &mut rx).await;

        coord.on_input_changed("narutoo".to_string());
        settle(&mut coord, &mut rx).await;

        assert_eq!(
            coord.state().error_message(),
            Some("you are being rate-limited; please wait a moment before searching again")
        );
        assert_eq!(coord.state().page.entries.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn identical_query_resettles_to_identical_results() {
        let provider = Arc::new(ScriptedProvider::new(Duration::ZERO));
        provider.respond_with(Ok(page_of(&[20, 1735], 1, 5)));
        provider.respond_with(Ok(page_of(&[20, 1735], 1, 5)));
        let (mut coord, mut rx) = coordinator(&provider);

        coord.on_input_changed("naruto".to_string());
        settle(&mut coord, &mut rx).await;
        let first = coord.state().page.clone();

        coord.on_input_changed("naruto".to_string());
        settle(&mut coord, &mut rx).await;
        assert_eq!(coord.state().page, first);
    }
}
