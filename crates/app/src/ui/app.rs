use std::sync::Arc;

use ratatui::Frame;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

use crate::coordinator::{Outcome, SearchCoordinator};
use crate::detail::DetailLookup;
use crate::state::AppState;
use crate::ui::views;

pub enum Route {
    Search,
    Detail,
}

/// Everything the event loop drives: the two request machines, the current
/// route, and the selection cursor. Leaving the detail view never touches
/// the search state, which lives above the routing.
pub struct App {
    route: Route,
    search: SearchCoordinator,
    detail: DetailLookup,
    selected: usize,
    should_quit: bool,
}

impl App {
    pub fn new(
        state: &AppState,
        outcomes: UnboundedSender<Outcome>,
        initial_query: Option<String>,
    ) -> Self {
        let mut search = SearchCoordinator::new(
            Arc::clone(&state.catalog),
            outcomes.clone(),
            state.config.debounce,
        );
        if let Some(query) = initial_query {
            search.on_input_changed(query);
        }
        let detail = DetailLookup::new(Arc::clone(&state.catalog), outcomes);
        App {
            route: Route::Search,
            search,
            detail,
            selected: 0,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn on_debounce_fired(&mut self) {
        self.search.on_debounce_fired();
    }

    pub fn on_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Search { generation, result } => {
                self.search.on_outcome(generation, result);
                self.clamp_selection();
            }
            Outcome::Detail { generation, result } => {
                self.detail.on_outcome(generation, result);
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.route {
            Route::Search => views::search::render(frame, &self.search, self.selected),
            Route::Detail => views::detail::render(frame, self.detail.state()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.route {
            Route::Search => self.handle_search_key(key),
            Route::Detail => self.handle_detail_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.open_selected(),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                let len = self.search.state().page.entries.len();
                if len > 0 && self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Left | KeyCode::PageUp => {
                let current = self.search.state().page.current_page;
                self.search.on_page_change(current.saturating_sub(1));
            }
            KeyCode::Right | KeyCode::PageDown => {
                let current = self.search.state().page.current_page;
                self.search.on_page_change(current + 1);
            }
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.push_char(ch);
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                self.detail.close();
                self.route = Route::Search;
            }
            _ => {}
        }
    }

    fn open_selected(&mut self) {
        let Some(entry) = self.search.state().page.entries.get(self.selected) else {
            return;
        };
        self.detail.open(entry.id);
        self.route = Route::Detail;
    }

    fn clamp_selection(&mut self) {
        let len = self.search.state().page.entries.len();
        self.selected = if len == 0 { 0 } else { self.selected.min(len - 1) };
    }
}
