// src/ui/widgets/input.rs

use crate::app::{App, AppState};
use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Renders the query input box. The right side of the title shows the lookup
/// source that will be submitted; while the user types it tracks the inferred
/// type, and once pinned with Tab it stays put.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let source_tag = if app.source_locked {
        format!(" source: {} (pinned) ", app.source)
    } else {
        format!(" source: {} ", app.source)
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .title("Query")
        .title(Line::from(source_tag).right_aligned());
    let input_paragraph = Paragraph::new(app.input.as_str())
        .block(input_block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input_paragraph, area);

    // Show the cursor only while the user can actually type.
    if let AppState::Idle = app.state {
        frame.set_cursor_position(Position::new(
            area.x + app.input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}
