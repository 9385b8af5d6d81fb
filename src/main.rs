// src/main.rs

use color_eyre::eyre::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;

use tracelens::app::{App, AppState};
use tracelens::core::client::{ClientConfig, ScanClient};
use tracelens::core::session::SessionEvent;
use tracelens::{logging, ui};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let client = ScanClient::new(ClientConfig::from_env())?;
    let mut app = App::new(client);
    let (tx, mut rx) = mpsc::channel(16);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(&mut app, &tx)?;
        }

        // Drain everything the session task reported since the last frame.
        while let Ok(session_event) = rx.try_recv() {
            app.apply_event(session_event);
        }

        app.on_tick();
    }

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    Ok(())
}

/// Single event handler to keep the loop body clean.
fn handle_events(app: &mut App, tx: &mpsc::Sender<SessionEvent>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, tx),
                AppState::Submitting | AppState::Polling => {
                    handle_scanning_input(app, key.code)
                }
                AppState::Done | AppState::Failed => handle_finished_input(app, key.code),
            }
        }
    }
    Ok(())
}

/// Idle is typing mode: every printable key belongs to the query, so only
/// non-printable keys carry commands here.
fn handle_idle_input(app: &mut App, key_code: KeyCode, tx: &mpsc::Sender<SessionEvent>) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab => app.cycle_source(),
        KeyCode::Char(c) => app.push_input(c),
        KeyCode::Backspace => app.pop_input(),
        KeyCode::Enter => app.start_scan(tx),
        _ => {}
    }
}

fn handle_scanning_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        // Abandons the running scan; its poll task is cancelled on reset.
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('l') => app.toggle_logs(),
        _ => {}
    }
}

fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('l') => app.toggle_logs(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::Left => app.scroll_log_left(),
        KeyCode::Right => app.scroll_log_right(),
        _ => {}
    }
}
