//! Tokio host for one [`PageShell`].
//!
//! # Task layout (for beginners)
//!
//! ```text
//!  RuntimeHandle ──(mpsc: Request)──► page task ──(watch)──► subscribers
//!                                        │   ▲
//!                                        │   └── interval: PageEvent::Tick
//!                                        ▼
//!                                    PageShell
//! ```
//!
//! The shell is not shared: exactly one task owns it and applies events one
//! at a time, so no locking is needed.  Everybody else talks to it through a
//! cloneable [`RuntimeHandle`]:
//!
//! - [`RuntimeHandle::send`] queues an event and returns immediately.
//! - [`RuntimeHandle::apply`] queues an event and waits for the state that
//!   follows it (used by `pagekit serve` to answer each input line).
//! - [`RuntimeHandle::subscribe`] returns a `watch` receiver that always holds
//!   the latest [`PresentationState`].
//!
//! Dropping every handle closes the request channel, which ends the loop and
//! hands the shell back through the task's `JoinHandle`.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::application::page_shell::{PageEvent, PageShell, PresentationState};
use crate::application::persistence::KeyValueStore;
use crate::infrastructure::ui_bridge::{CommandResult, IntentMsg, PresentationDto};

/// Capacity of the request channel.
const REQUEST_BUFFER: usize = 256;

/// Error type for runtime operations.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The page task has exited.
    #[error("page runtime has stopped")]
    Stopped,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode reply: {0}")]
    Encode(#[from] serde_json::Error),
}

struct Request {
    event: Option<PageEvent>,
    reply: Option<oneshot::Sender<PresentationState>>,
}

/// Cloneable entry point to a running page task.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    requests: mpsc::Sender<Request>,
    state: watch::Receiver<PresentationState>,
}

impl RuntimeHandle {
    /// Queues `event` without waiting for it to be handled.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Stopped`] if the page task has exited.
    pub async fn send(&self, event: PageEvent) -> Result<(), RuntimeError> {
        self.requests
            .send(Request {
                event: Some(event),
                reply: None,
            })
            .await
            .map_err(|_| RuntimeError::Stopped)
    }

    /// Queues `event` (if any) and returns the state right after it.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Stopped`] if the page task has exited.
    pub async fn apply(&self, event: Option<PageEvent>) -> Result<PresentationState, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.requests
            .send(Request {
                event,
                reply: Some(reply),
            })
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        rx.await.map_err(|_| RuntimeError::Stopped)
    }

    /// Receiver that always holds the latest published state.
    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.state.clone()
    }

    pub fn latest(&self) -> PresentationState {
        self.state.borrow().clone()
    }
}

/// Spawns the page task on the current tokio runtime.
///
/// `tick_interval` is the period of the injected [`PageEvent::Tick`]s, which
/// drive the resize debounce and notice lifecycles.
pub fn spawn_page<S>(
    shell: PageShell<S>,
    tick_interval: Duration,
) -> (RuntimeHandle, JoinHandle<PageShell<S>>)
where
    S: KeyValueStore + Send + 'static,
{
    let (requests, rx) = mpsc::channel(REQUEST_BUFFER);
    let (state_tx, state) = watch::channel(shell.state());
    let task = tokio::spawn(run_page(shell, tick_interval, rx, state_tx));
    (RuntimeHandle { requests, state }, task)
}

async fn run_page<S: KeyValueStore>(
    mut shell: PageShell<S>,
    tick_interval: Duration,
    mut requests: mpsc::Receiver<Request>,
    state_tx: watch::Sender<PresentationState>,
) -> PageShell<S> {
    let started = Instant::now();
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(tick_ms = tick_interval.as_millis() as u64, "page runtime started");

    loop {
        tokio::select! {
            request = requests.recv() => {
                let Some(Request { event, reply }) = request else {
                    break;
                };
                if let Some(event) = event {
                    shell.handle(started.elapsed(), event);
                }
                let state = shell.state();
                state_tx.send_replace(state.clone());
                if let Some(reply) = reply {
                    // The caller may have given up waiting; nothing to do then.
                    reply.send(state).ok();
                }
            }
            _ = ticker.tick() => {
                shell.handle(started.elapsed(), PageEvent::Tick);
                let state = shell.state();
                state_tx.send_if_modified(|current| {
                    if *current == state {
                        return false;
                    }
                    *current = state;
                    true
                });
            }
        }
    }

    info!("page runtime stopped");
    shell
}

/// Line protocol used by `pagekit serve`: one JSON [`IntentMsg`] per input
/// line, one JSON [`CommandResult`] per output line.  Blank lines are
/// skipped.  Returns when `input` reaches end of file.
///
/// # Errors
///
/// [`RuntimeError::Io`] if reading or writing fails, and
/// [`RuntimeError::Stopped`] if the page task exits first.
pub async fn serve_lines<R, W>(
    handle: &RuntimeHandle,
    input: R,
    mut output: W,
) -> Result<(), RuntimeError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<IntentMsg>(&line) {
            Ok(msg) => {
                let state = handle.apply(msg.into_event()).await?;
                CommandResult::ok(PresentationDto::from(&state))
            }
            Err(e) => {
                debug!("rejected input line: {e}");
                CommandResult::err(format!("invalid message: {e}"))
            }
        };
        let mut encoded = serde_json::to_vec(&reply)?;
        encoded.push(b'\n');
        output.write_all(&encoded).await?;
        output.flush().await?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
