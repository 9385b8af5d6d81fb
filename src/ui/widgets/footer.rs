// src/ui/widgets/footer.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

fn key(label: &str) -> Span<'_> {
    Span::styled(label, Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer bar: which keys do what in the current state.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let spans = match app.state {
        AppState::Idle => Line::from(vec![
            key("Enter"),
            Span::raw(" scan, "),
            key("Tab"),
            Span::raw(" source, "),
            key("Esc"),
            Span::raw(" quit"),
        ]),
        AppState::Submitting | AppState::Polling => Line::from(vec![
            Span::raw("Scanning... "),
            key("[N]"),
            Span::raw("ew scan, "),
            key("[L]"),
            Span::raw("ogs, "),
            key("[Q]"),
            Span::raw("uit"),
        ]),
        AppState::Done | AppState::Failed => Line::from(vec![
            key("[N]"),
            Span::raw("ew scan, "),
            key("[L]"),
            Span::raw("ogs, "),
            key("↑↓"),
            Span::raw(" scroll, "),
            key("[Q]"),
            Span::raw("uit"),
        ]),
    };

    let footer = Paragraph::new(spans).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
