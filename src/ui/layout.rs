// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// The named regions of the dashboard screen.
///
/// Holding precomputed `Rect`s keeps the widgets from re-deriving dimensions
/// on every draw: the query input sits on top, the normalized dashboard and
/// the live status feed share the middle, and a one-line key hint closes the
/// bottom. The log panel only gets space while it is toggled on.
pub struct AppLayout {
    pub input: Rect,
    pub dashboard: Rect,
    pub status_feed: Rect,
    pub log_panel: Rect,
    pub footer: Rect,
}

pub fn create_layout(frame_size: Rect, show_logs: bool) -> AppLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame_size);

    let content_constraints = if show_logs {
        vec![
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ]
    } else {
        vec![Constraint::Percentage(55), Constraint::Percentage(45)]
    };

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(content_constraints)
        .split(main_chunks[1]);

    AppLayout {
        input: main_chunks[0],
        dashboard: content_chunks[0],
        status_feed: content_chunks[1],
        log_panel: if show_logs { content_chunks[2] } else { Rect::default() },
        footer: main_chunks[2],
    }
}
