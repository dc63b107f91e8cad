use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use aniscope_core::domain::detail::DetailState;
use aniscope_core::domain::entry::CatalogEntry;

pub fn render(frame: &mut Frame, state: Option<&DetailState>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let body = match state {
        Some(DetailState::Loading { id }) => {
            Paragraph::new(format!("Loading entry {id}...")).style(Style::default().fg(Color::Yellow))
        }
        Some(DetailState::Found(entry)) => found(entry),
        Some(DetailState::NotFound { message }) => {
            Paragraph::new(message.clone()).style(Style::default().fg(Color::Yellow))
        }
        Some(DetailState::Error { message }) => {
            Paragraph::new(format!("Error: {message}")).style(Style::default().fg(Color::Red))
        }
        // The route only enters this view after an open(), but render
        // something sane regardless.
        None => Paragraph::new(""),
    };
    frame.render_widget(body.block(Block::bordered().title("Details")), layout[0]);

    let hint = Paragraph::new("Esc back to search")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, layout[1]);
}

fn found(entry: &CatalogEntry) -> Paragraph<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            entry.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Score: {}",
            entry
                .score
                .map(|score| format!("{score:.2}"))
                .unwrap_or_else(|| "unrated".to_string())
        )),
    ];
    if let Some(episodes) = entry.episodes {
        lines.push(Line::from(format!("Episodes: {episodes}")));
    }
    if let Some(aired) = entry.aired_from {
        lines.push(Line::from(format!(
            "First aired: {}",
            aired.format("%Y-%m-%d")
        )));
    }
    if !entry.poster_url.is_empty() {
        lines.push(Line::from(format!("Poster: {}", entry.poster_url)));
    }
    lines.push(Line::default());
    lines.push(Line::from(
        entry
            .synopsis
            .clone()
            .unwrap_or_else(|| "No synopsis available.".to_string()),
    ));
    Paragraph::new(lines).wrap(Wrap { trim: true })
}
