mod app;
mod input;
mod views;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::info;

use crate::state::AppState;
use app::App;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("terminal io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input channel closed")]
    InputClosed,
}

pub async fn run(state: AppState, initial_query: Option<String>) -> Result<(), UiError> {
    let mut terminal = ratatui::init();
    let result = run_loop(&mut terminal, state, initial_query).await;
    ratatui::restore();
    result
}

async fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    state: AppState,
    initial_query: Option<String>,
) -> Result<(), UiError> {
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let (input_thread, mut input_rx) = input::spawn();
    let mut app = App::new(&state, outcome_tx, initial_query);
    info!("ui started");

    let result = loop {
        terminal.draw(|frame| app.draw(frame))?;
        tokio::select! {
            event = input_rx.recv() => match event {
                Some(event) => app.handle_event(event),
                None => break Err(UiError::InputClosed),
            },
            Some(outcome) = outcome_rx.recv() => app.on_outcome(outcome),
            _ = debounce_wait(app.search_deadline()) => app.on_debounce_fired(),
        }
        if app.should_quit() {
            break Ok(());
        }
    };

    input_thread.stop();
    result
}

/// Pends forever while no debounce deadline is armed, so the select branch
/// simply never fires.
async fn debounce_wait(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
