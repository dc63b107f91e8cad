use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, TableState};

use aniscope_core::domain::search::{SearchPhase, SearchState};

use crate::coordinator::SearchCoordinator;

const HIGHLIGHT_SYMBOL: &str = "> ";

pub fn render(frame: &mut Frame, search: &SearchCoordinator, selected: usize) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let input = Paragraph::new(search.input()).block(Block::bordered().title("Search the catalog"));
    frame.render_widget(input, layout[0]);

    let state = search.state();
    frame.render_widget(status_line(state), layout[1]);
    render_results(frame, layout[2], state, selected);
    frame.render_widget(footer(state), layout[3]);
}

fn status_line(state: &SearchState) -> Paragraph<'static> {
    let (text, style) = match &state.phase {
        SearchPhase::Pending => (
            "Searching...".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        SearchPhase::Failed { message } => (
            format!("Error: {message}"),
            Style::default().fg(Color::Red),
        ),
        SearchPhase::Succeeded if state.no_results => (
            format!(
                "No results for \"{}\". Try a different search term.",
                state.last_query
            ),
            Style::default().fg(Color::DarkGray),
        ),
        SearchPhase::Succeeded => (
            format!("Results for \"{}\".", state.last_query),
            Style::default(),
        ),
        SearchPhase::Idle => (
            "Type at least 3 characters to search.".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };
    Paragraph::new(text).style(style)
}

fn render_results(frame: &mut Frame, area: Rect, state: &SearchState, selected: usize) {
    if state.page.is_empty() {
        return;
    }
    let header = Row::new([
        Cell::from("Title"),
        Cell::from("Score"),
        Cell::from("Episodes"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);
    let rows = state.page.entries.iter().map(|entry| {
        Row::new([
            Cell::from(entry.title.as_str()),
            Cell::from(
                entry
                    .score
                    .map(|score| format!("{score:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::from(
                entry
                    .episodes
                    .map(|episodes| episodes.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ])
    });
    let widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(HIGHLIGHT_SYMBOL);
    let mut table_state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn footer(state: &SearchState) -> Paragraph<'static> {
    let text = if state.page.is_empty() {
        "Esc quit".to_string()
    } else {
        format!(
            "Page {} of {}  Left/Right page  Up/Down select  Enter details  Esc quit",
            state.page.current_page, state.page.total_pages
        )
    };
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
}
