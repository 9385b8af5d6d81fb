// src/app.rs

use crate::core::client::{ScanClient, ScanError};
use crate::core::models::{LookupSource, ScanHandle, ScanRequest, ScanStatus};
use crate::core::normalizer::{normalize, Section};
use crate::core::session::{ScanSession, SessionEvent};
use crate::logging;
use ratatui::widgets::ScrollbarState;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

pub const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Lifecycle of the one tracked scan. `Submitting` covers the window between
/// the Enter key and the backend handing back a job id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Idle,
    Submitting,
    Polling,
    Done,
    Failed,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub source: LookupSource,
    // Set once the user cycles the source by hand; stops auto-inference
    // from fighting their choice.
    pub source_locked: bool,
    pub handle: Option<ScanHandle>,
    /// Latest raw poll body, pretty-printed for the live feed.
    pub raw_status: String,
    pub sections: Vec<Section>,
    pub last_error: Option<String>,
    pub spinner_frame: usize,
    pub scroll_offset: usize,
    pub dashboard_scroll_state: ScrollbarState,
    pub show_logs: bool,
    pub log_content: Vec<String>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
    client: ScanClient,
    session: Option<ScanSession>,
}

impl App {
    pub fn new(client: ScanClient) -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            source: LookupSource::Domain,
            source_locked: false,
            handle: None,
            raw_status: String::new(),
            sections: Vec::new(),
            last_error: None,
            spinner_frame: 0,
            scroll_offset: 0,
            dashboard_scroll_state: ScrollbarState::default(),
            show_logs: false,
            log_content: Vec::new(),
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
            client,
            session: None,
        }
    }

    // --- Input handling ---

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
        self.infer_source();
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
        self.infer_source();
    }

    fn infer_source(&mut self) {
        if !self.source_locked {
            self.source = LookupSource::infer(&self.input);
        }
    }

    /// Tab: step to the next lookup source and pin the manual choice.
    pub fn cycle_source(&mut self) {
        let all: Vec<LookupSource> = LookupSource::iter().collect();
        let current = all.iter().position(|s| *s == self.source).unwrap_or(0);
        self.source = all[(current + 1) % all.len()];
        self.source_locked = true;
    }

    // --- Scan lifecycle ---

    /// Validates and launches a new scan session. Anything rendered by a
    /// previous scan is cleared first, and a still-running session is
    /// cancelled, so two poll timers can never coexist.
    pub fn start_scan(&mut self, tx: &mpsc::Sender<SessionEvent>) {
        self.last_error = None;
        let query = self.input.trim().to_string();
        if query.is_empty() {
            self.last_error =
                Some(ScanError::Validation("query must not be empty".to_string()).to_string());
            return;
        }

        if let Some(session) = self.session.take() {
            session.cancel();
        }
        self.clear_dashboard();

        let request = ScanRequest::new(query, self.source);
        self.state = AppState::Submitting;
        self.session = Some(ScanSession::spawn(self.client.clone(), request, tx.clone()));
    }

    pub fn apply_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Submitted { id } => {
                self.handle = Some(ScanHandle { id });
                self.state = AppState::Polling;
            }
            SessionEvent::SubmitFailed(e) => {
                self.last_error = Some(e.to_string());
                self.state = AppState::Idle;
            }
            SessionEvent::Status { status, raw } => {
                self.raw_status = pretty_json(&raw);
                match status {
                    ScanStatus::Queued | ScanStatus::Running => {}
                    ScanStatus::Done(bundle) => {
                        self.sections = normalize(&bundle);
                        self.state = AppState::Done;
                    }
                    ScanStatus::Failed(message) => {
                        self.last_error = Some(ScanError::ScanFailed(message).to_string());
                        self.state = AppState::Failed;
                    }
                }
            }
            SessionEvent::Malformed { raw } => {
                // Still worth showing: the live feed is raw progress.
                self.raw_status = pretty_json(&raw);
            }
            SessionEvent::TransportFailed(e) => {
                self.last_error = Some(e.to_string());
                self.state = AppState::Failed;
            }
        }
        if self.show_logs {
            self.refresh_logs();
        }
    }

    /// Back to a blank slate for the next scan. Every rendered region is
    /// cleared here, before any new section can appear.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel();
        }
        self.clear_dashboard();
        self.state = AppState::Idle;
        self.input = String::new();
        self.source = LookupSource::Domain;
        self.source_locked = false;
        self.last_error = None;
    }

    fn clear_dashboard(&mut self) {
        self.sections = Vec::new();
        self.raw_status = String::new();
        self.handle = None;
        self.scroll_offset = 0;
        self.dashboard_scroll_state = ScrollbarState::default();
    }

    // --- UI state ---

    pub fn on_tick(&mut self) {
        if matches!(self.state, AppState::Submitting | AppState::Polling) {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.dashboard_scroll_state = self.dashboard_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
        self.dashboard_scroll_state = self.dashboard_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_log_left(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_sub(4);
        self.log_horizontal_scroll_state =
            self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn scroll_log_right(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_add(4);
        self.log_horizontal_scroll_state =
            self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if self.show_logs {
            self.refresh_logs();
        }
    }

    /// Tails the tracing log file into the log panel.
    pub fn refresh_logs(&mut self) {
        if let Ok(content) = std::fs::read_to_string(logging::log_file_path()) {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(200);
            self.log_content = lines[start..].iter().map(|l| l.to_string()).collect();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn pretty_json(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
