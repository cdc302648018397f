//! Search submission lifecycle: Idle -> Loading -> Success | Error.
//!
//! The controller decides *what* to request and how to fold the response
//! into the live [`SearchSession`]; the caller performs the request and
//! reports back with the [`RequestSeq`] it was given. Timestamps are passed
//! in so the state machine stays free of clocks.

use cord_search_api::{ApiError, SearchResult};
use serde::Serialize;
use tokio::time::Instant;

use crate::query::{SearchMode, compose};
use crate::sequence::{RequestSeq, Sequencer};

/// Shown when a failure carries no message of its own.
pub const GENERIC_CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the search service. Check your connection and try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// The one live search. Replaced wholesale on every transition, so readers
/// never observe a half-applied response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSession {
    /// Raw text of the submitted query, as typed.
    pub query: String,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub error: Option<String>,
    pub elapsed_ms: Option<f64>,
    pub total_count: usize,
}

/// A search the caller must send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: RequestSeq,
    pub raw_text: String,
    pub mode: SearchMode,
    pub wire_query: String,
}

#[derive(Debug, Clone)]
struct AcceptedQuery {
    raw_text: String,
    mode: SearchMode,
}

#[derive(Debug, Default)]
pub struct SearchSessionController {
    session: SearchSession,
    phase: SessionPhase,
    mode: SearchMode,
    last: Option<AcceptedQuery>,
    sequencer: Sequencer,
    started_at: Option<Instant>,
}

impl SearchSessionController {
    #[must_use]
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Change the mode used by the next submission. Sends nothing.
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    /// Whether [`Self::retry`] would issue a request.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.last.is_some()
    }

    /// Start a search for `raw_text` with the current mode.
    ///
    /// Returns `None`, leaving every piece of state untouched, when the text
    /// is empty or whitespace.
    pub fn submit(&mut self, raw_text: &str, now: Instant) -> Option<SearchRequest> {
        self.submit_with_mode(raw_text, self.mode, now)
    }

    /// Re-issue the last accepted query with the mode it was submitted under.
    pub fn retry(&mut self, now: Instant) -> Option<SearchRequest> {
        let last = self.last.clone()?;
        tracing::debug!("retrying last query");
        self.submit_with_mode(&last.raw_text, last.mode, now)
    }

    /// Fold a response into the session. Returns `false` if it was stale:
    /// superseded by a newer submission or issued before a reset.
    pub fn on_response(
        &mut self,
        seq: RequestSeq,
        outcome: Result<Vec<SearchResult>, ApiError>,
        finished_at: Instant,
    ) -> bool {
        if !self.sequencer.is_current(seq) || self.phase != SessionPhase::Loading {
            tracing::trace!(seq = seq.get(), "discarding stale search response");
            return false;
        }

        let query = std::mem::take(&mut self.session.query);
        let started_at = self.started_at.take();

        self.session = match outcome {
            Ok(results) => {
                let elapsed_ms = started_at
                    .map(|start| finished_at.saturating_duration_since(start).as_secs_f64() * 1000.0);
                tracing::debug!(count = results.len(), ?elapsed_ms, "search succeeded");
                self.phase = SessionPhase::Success;
                SearchSession {
                    query,
                    total_count: results.len(),
                    results,
                    loading: false,
                    error: None,
                    elapsed_ms,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                self.phase = SessionPhase::Error;
                SearchSession {
                    query,
                    error: Some(error_message(&e)),
                    ..Default::default()
                }
            }
        };
        true
    }

    /// Return to the pre-search state. An in-flight request is not aborted,
    /// but its response will be discarded.
    pub fn reset(&mut self) {
        self.sequencer.invalidate();
        self.session = SearchSession::default();
        self.phase = SessionPhase::Idle;
        self.last = None;
        self.started_at = None;
    }

    fn submit_with_mode(
        &mut self,
        raw_text: &str,
        mode: SearchMode,
        now: Instant,
    ) -> Option<SearchRequest> {
        if raw_text.trim().is_empty() {
            tracing::trace!("ignoring empty submission");
            return None;
        }

        let wire_query = compose(raw_text, mode);
        let seq = self.sequencer.issue();
        tracing::debug!(seq = seq.get(), %mode, "submitting search");

        self.session = SearchSession {
            query: raw_text.to_owned(),
            loading: true,
            ..Default::default()
        };
        self.phase = SessionPhase::Loading;
        self.started_at = Some(now);
        self.last = Some(AcceptedQuery {
            raw_text: raw_text.to_owned(),
            mode,
        });

        Some(SearchRequest {
            seq,
            raw_text: raw_text.to_owned(),
            mode,
            wire_query,
        })
    }
}

/// User-facing message for a failed search.
#[must_use]
pub fn error_message(err: &ApiError) -> String {
    match err {
        ApiError::Http(detail) | ApiError::Timeout(detail) if detail.trim().is_empty() => {
            GENERIC_CONNECTIVITY_MESSAGE.to_owned()
        }
        other => other.to_string(),
    }
}
