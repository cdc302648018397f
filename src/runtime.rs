//! Event loop that owns the [`SearchController`] and carries out its effects.
//!
//! Everything that mutates controller state runs on the single task driving
//! [`SearchRuntime::run`]: host commands arrive over an mpsc channel, and
//! timer fires and network completions come back over a second one. The
//! spawned tasks never touch the controller directly.

use std::sync::Arc;

use cord_search_api::{ApiError, SearchBackend, SearchResult};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::controller::{Command, Effect, SearchController, Snapshot};
use crate::error::{ClientError, Result};
use crate::query::SearchMode;
use crate::sequence::RequestSeq;
use crate::session::SessionPhase;
use crate::suggest::Debouncer;

/// Default request channel capacity.
pub const REQUEST_CAPACITY: usize = 64;

/// Default snapshot broadcast capacity.
pub const EVENT_CAPACITY: usize = 128;

/// State after a command, plus whether the host should swallow the key.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub snapshot: Snapshot,
    pub prevent_default: bool,
}

struct RuntimeRequest {
    command: Command,
    reply_tx: oneshot::Sender<Reply>,
}

enum Completion {
    DebounceElapsed {
        generation: u64,
        token: String,
    },
    Suggestions {
        seq: RequestSeq,
        outcome: std::result::Result<Vec<String>, ApiError>,
    },
    Search {
        seq: RequestSeq,
        outcome: std::result::Result<Vec<SearchResult>, ApiError>,
        finished_at: Instant,
    },
}

/// Cloneable sender side of the runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    request_tx: mpsc::Sender<RuntimeRequest>,
    snapshot_tx: broadcast::Sender<Snapshot>,
}

impl RuntimeHandle {
    /// Apply `command` and wait for the resulting state.
    pub async fn send(&self, command: Command) -> Result<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request_tx
            .send(RuntimeRequest { command, reply_tx })
            .await
            .map_err(|e| ClientError::Channel(format!("failed to send runtime command: {e}")))?;

        reply_rx
            .await
            .map_err(|e| ClientError::Channel(format!("runtime reply dropped: {e}")))
    }

    /// Current state without changing anything.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.send(Command::Snapshot).await?.snapshot)
    }

    /// Snapshots published after asynchronous transitions (suggestions
    /// arrived, a search finished). Command replies are not repeated here.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }
}

/// Wait on `events` until a search settles into success or error.
///
/// Lagging behind the broadcast only skips intermediate snapshots.
pub async fn wait_settled(events: &mut broadcast::Receiver<Snapshot>) -> Result<Snapshot> {
    loop {
        match events.recv().await {
            Ok(snapshot)
                if matches!(snapshot.phase, SessionPhase::Success | SessionPhase::Error) =>
            {
                return Ok(snapshot);
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "snapshot receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Err(ClientError::Channel(
                    "runtime stopped before the search settled".to_owned(),
                ));
            }
        }
    }
}

pub struct SearchRuntime<B: SearchBackend + 'static> {
    controller: SearchController,
    backend: Arc<B>,
    request_rx: mpsc::Receiver<RuntimeRequest>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    snapshot_tx: broadcast::Sender<Snapshot>,
    debouncer: Debouncer,
}

#[must_use]
pub fn runtime_channel<B: SearchBackend + 'static>(
    backend: Arc<B>,
    mode: SearchMode,
    request_capacity: usize,
    event_capacity: usize,
) -> (RuntimeHandle, SearchRuntime<B>) {
    let (request_tx, request_rx) = mpsc::channel(request_capacity.max(1));
    let (snapshot_tx, _snapshot_rx) = broadcast::channel(event_capacity.max(1));
    let (completion_tx, completion_rx) = mpsc::unbounded_channel();

    (
        RuntimeHandle {
            request_tx,
            snapshot_tx: snapshot_tx.clone(),
        },
        SearchRuntime {
            controller: SearchController::new(mode),
            backend,
            request_rx,
            completion_tx,
            completion_rx,
            snapshot_tx,
            debouncer: Debouncer::new(),
        },
    )
}

/// Spawn a runtime with default capacities onto the current tokio runtime.
///
/// The task exits once every [`RuntimeHandle`] has been dropped.
pub fn spawn_runtime<B: SearchBackend + 'static>(
    backend: Arc<B>,
    mode: SearchMode,
) -> (RuntimeHandle, JoinHandle<()>) {
    let (handle, runtime) = runtime_channel(backend, mode, REQUEST_CAPACITY, EVENT_CAPACITY);
    (handle, tokio::spawn(runtime.run()))
}

impl<B: SearchBackend + 'static> SearchRuntime<B> {
    pub async fn run(mut self) {
        tracing::debug!("search runtime started");
        loop {
            tokio::select! {
                request = self.request_rx.recv() => {
                    let Some(request) = request else {
                        break;
                    };
                    let applied = self.controller.apply(request.command, Instant::now());
                    self.execute(applied.effects);
                    let _ = request.reply_tx.send(Reply {
                        snapshot: self.controller.snapshot(),
                        prevent_default: applied.prevent_default,
                    });
                }
                Some(completion) = self.completion_rx.recv() => {
                    if self.complete(completion) {
                        let _ = self.snapshot_tx.send(self.controller.snapshot());
                    }
                }
            }
        }
        self.debouncer.cancel();
        tracing::debug!("search runtime stopped");
    }

    /// Feed a completion back into the controller. Returns whether the
    /// visible state changed.
    fn complete(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::DebounceElapsed { generation, token } => {
                let effects = self.controller.on_debounce_elapsed(generation, token);
                let changed = !effects.is_empty();
                self.execute(effects);
                changed
            }
            Completion::Suggestions { seq, outcome } => self.controller.on_suggestions(seq, outcome),
            Completion::Search {
                seq,
                outcome,
                finished_at,
            } => self.controller.on_search_finished(seq, outcome, finished_at),
        }
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CancelDebounce => {
                    self.debouncer.cancel();
                }
                Effect::ScheduleDebounce {
                    generation,
                    token,
                    delay,
                } => {
                    let tx = self.completion_tx.clone();
                    self.debouncer.schedule(delay, async move {
                        let _ = tx.send(Completion::DebounceElapsed { generation, token });
                    });
                }
                Effect::FetchSuggestions { seq, token } => {
                    let backend = Arc::clone(&self.backend);
                    let tx = self.completion_tx.clone();
                    tokio::spawn(async move {
                        tracing::trace!(%token, "autocomplete request");
                        let outcome = backend.autocomplete(&token).await;
                        let _ = tx.send(Completion::Suggestions { seq, outcome });
                    });
                }
                Effect::Search(request) => {
                    let backend = Arc::clone(&self.backend);
                    let tx = self.completion_tx.clone();
                    tokio::spawn(async move {
                        tracing::debug!(wire_query = %request.wire_query, "search request");
                        let outcome = backend.search(&request.wire_query).await;
                        let finished_at = Instant::now();
                        let _ = tx.send(Completion::Search {
                            seq: request.seq,
                            outcome,
                            finished_at,
                        });
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_in(phase: SessionPhase) -> Snapshot {
        let mut snapshot = SearchController::default().snapshot();
        snapshot.phase = phase;
        snapshot
    }

    #[tokio::test]
    async fn wait_settled_survives_lag() {
        let (tx, mut rx) = broadcast::channel(2);
        for _ in 0..4 {
            tx.send(snapshot_in(SessionPhase::Loading)).expect("send");
        }
        tx.send(snapshot_in(SessionPhase::Success)).expect("send");

        let settled = wait_settled(&mut rx).await.expect("settled");
        assert_eq!(settled.phase, SessionPhase::Success);
    }

    #[tokio::test]
    async fn wait_settled_reports_closed_channel() {
        let (tx, mut rx) = broadcast::channel(4);
        tx.send(snapshot_in(SessionPhase::Loading)).expect("send");
        drop(tx);

        let err = wait_settled(&mut rx).await.expect_err("closed");
        assert!(matches!(err, ClientError::Channel(_)));
    }
}
