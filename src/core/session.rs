// src/core/session.rs

use tracing::{info, warn};

use crate::core::client::{ScanClient, ScanError};
use crate::core::models::{ScanRequest, ScanStatus};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Everything a running session reports back to the UI loop. Every poll tick
/// is forwarded, terminal or not, so the user watches raw progress rather
/// than only the final state.
#[derive(Debug)]
pub enum SessionEvent {
    /// The backend accepted the job; polling starts now.
    Submitted { id: String },
    /// Job creation failed. The session is over before it began.
    SubmitFailed(ScanError),
    /// One decoded status tick, with the raw body for the live feed.
    Status { status: ScanStatus, raw: String },
    /// A body that did not decode as a known status shape. Non-fatal: the
    /// loop keeps polling and treats it as a non-terminal tick.
    Malformed { raw: String },
    /// The status request itself failed. Fatal: polling a dead backend
    /// forever helps nobody, so the loop stops here.
    TransportFailed(ScanError),
}

/// One submit-poll lifecycle, owned by a single tokio task.
///
/// The task is the poll timer: it issues one status request, waits for the
/// response, emits the tick, sleeps the configured interval, and repeats, so
/// at most one request is ever in flight. It breaks strictly at the first
/// terminal status. The `JoinHandle` kept here is the cancellation handle;
/// dropping or replacing a session aborts its task, which is what guarantees
/// a new scan can never coexist with a previous scan's timer.
pub struct ScanSession {
    task: JoinHandle<()>,
}

impl ScanSession {
    pub fn spawn(
        client: ScanClient,
        request: ScanRequest,
        tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        let task = tokio::spawn(run_session(client, request, tx));
        Self { task }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_session(client: ScanClient, request: ScanRequest, tx: mpsc::Sender<SessionEvent>) {
    let handle = match client.submit(&request).await {
        Ok(handle) => {
            let _ = tx
                .send(SessionEvent::Submitted { id: handle.id.clone() })
                .await;
            handle
        }
        Err(e) => {
            let _ = tx.send(SessionEvent::SubmitFailed(e)).await;
            return;
        }
    };

    let interval = client.config().poll_interval;
    loop {
        match client.fetch_status(&handle).await {
            Ok(raw) => match ScanStatus::decode(&raw) {
                Ok(status) => {
                    let terminal = status.is_terminal();
                    let _ = tx.send(SessionEvent::Status { status, raw }).await;
                    if terminal {
                        info!(id = %handle.id, "Scan reached terminal state, polling stopped.");
                        break;
                    }
                }
                Err(e) => {
                    warn!(id = %handle.id, error = %e, "Undecodable status body, continuing.");
                    let _ = tx.send(SessionEvent::Malformed { raw }).await;
                }
            },
            Err(e) => {
                let _ = tx.send(SessionEvent::TransportFailed(e)).await;
                break;
            }
        }

        tokio::time::sleep(interval).await;
    }
}
