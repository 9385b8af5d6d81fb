// src/ui/widgets/status_view.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Renders the live status feed: the raw body of the latest poll response,
/// pretty-printed, updated on every tick. Analysts want to see the backend's
/// actual progress output, not a sanitized version of it.
pub fn render_status_view(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.handle {
        Some(handle) => format!("Live Status — job {}", handle.id),
        None => "Live Status".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.raw_status.is_empty() {
        let placeholder = match app.state {
            AppState::Idle => "Raw poll output will appear here.",
            _ => "Waiting for the first status response...",
        };
        frame.render_widget(
            Paragraph::new(placeholder)
                .block(block)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let feed = Paragraph::new(app.raw_status.as_str())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(feed, area);
}
