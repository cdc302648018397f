//! Debounced, token-aware autocomplete.
//!
//! [`SuggestionEngine`] is a plain state object. Its transitions return a
//! [`SuggestEffect`] describing the timer or network work the caller must
//! perform; completions are fed back through [`SuggestionEngine::on_timer`]
//! and [`SuggestionEngine::on_response`]. The engine never surfaces an
//! error: a failed fetch simply leaves the list empty.

pub mod debounce;

use std::time::Duration;

use cord_search_api::ApiError;

use crate::query::last_token;
use crate::sequence::{RequestSeq, Sequencer};

pub use debounce::Debouncer;

/// Quiet period after the last qualifying keystroke before fetching.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(150);

/// Shortest token (in characters) worth asking the service about.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Work requested by a [`SuggestionEngine`] transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestEffect {
    /// Nothing to do.
    None,
    /// Cancel the pending debounce timer, if any.
    Cancel,
    /// Restart the debounce timer. When it fires, call
    /// [`SuggestionEngine::on_timer`] with `generation` and `token`.
    Schedule {
        generation: u64,
        token: String,
        delay: Duration,
    },
    /// Request suggestions for `token`, then call
    /// [`SuggestionEngine::on_response`] with `seq`.
    Fetch { seq: RequestSeq, token: String },
}

/// Suggestion list, loading flag, and the bookkeeping that keeps stale
/// timers and responses from touching them.
#[derive(Debug, Default)]
pub struct SuggestionEngine {
    suggestions: Vec<String>,
    loading: bool,
    generation: u64,
    sequencer: Sequencer,
}

impl SuggestionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current suggestions, in service order.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Suggestion at `index`, if present.
    #[must_use]
    pub fn suggestion(&self, index: usize) -> Option<&str> {
        self.suggestions.get(index).map(String::as_str)
    }

    /// The list is open exactly when it is non-empty.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    /// Whether an autocomplete request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// React to the full input text after every change.
    pub fn on_input(&mut self, input: &str) -> SuggestEffect {
        let token = last_token(input);
        if token.chars().count() < MIN_TOKEN_CHARS {
            tracing::trace!("active token too short; clearing suggestions");
            return self.dismiss();
        }

        self.generation += 1;
        SuggestEffect::Schedule {
            generation: self.generation,
            token: token.to_owned(),
            delay: DEBOUNCE_DELAY,
        }
    }

    /// The debounce timer scheduled under `generation` has fired.
    ///
    /// A fire from a superseded generation is ignored; this covers the case
    /// where an abort raced with the timer completing.
    pub fn on_timer(&mut self, generation: u64, token: String) -> SuggestEffect {
        if generation != self.generation {
            tracing::trace!(generation, current = self.generation, "ignoring superseded timer");
            return SuggestEffect::None;
        }
        let seq = self.sequencer.issue();
        self.loading = true;
        tracing::debug!(seq = seq.get(), "fetching suggestions");
        SuggestEffect::Fetch { seq, token }
    }

    /// Apply an autocomplete response. Returns `false` if it was stale.
    pub fn on_response(&mut self, seq: RequestSeq, outcome: Result<Vec<String>, ApiError>) -> bool {
        if !self.sequencer.is_current(seq) {
            tracing::trace!(seq = seq.get(), "discarding superseded suggestions");
            return false;
        }
        self.loading = false;
        match outcome {
            Ok(list) => self.suggestions = list,
            Err(e) => {
                tracing::debug!(error = %e, "autocomplete failed; showing no suggestions");
                self.suggestions.clear();
            }
        }
        true
    }

    /// Close the list: clear it, cancel the timer, and make any in-flight
    /// request stale.
    pub fn dismiss(&mut self) -> SuggestEffect {
        self.suggestions.clear();
        self.loading = false;
        self.generation += 1;
        self.sequencer.invalidate();
        SuggestEffect::Cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule_and_fire(engine: &mut SuggestionEngine, input: &str) -> (RequestSeq, String) {
        let SuggestEffect::Schedule {
            generation, token, ..
        } = engine.on_input(input)
        else {
            unreachable!("input {input:?} should schedule a fetch");
        };
        match engine.on_timer(generation, token) {
            SuggestEffect::Fetch { seq, token } => (seq, token),
            other => unreachable!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn short_tokens_never_schedule() {
        let mut engine = SuggestionEngine::new();
        for input in ["", "v", "covid v", "covid ", "   "] {
            assert_eq!(engine.on_input(input), SuggestEffect::Cancel, "input {input:?}");
        }
    }

    #[test]
    fn qualifying_token_schedules_with_fixed_delay() {
        let mut engine = SuggestionEngine::new();
        match engine.on_input("covid va") {
            SuggestEffect::Schedule { token, delay, .. } => {
                assert_eq!(token, "va");
                assert_eq!(delay, Duration::from_millis(150));
            }
            other => unreachable!("expected schedule, got {other:?}"),
        }
    }

    #[test]
    fn token_length_counts_characters_not_bytes() {
        let mut engine = SuggestionEngine::new();
        // "é" is two bytes but one character.
        assert_eq!(engine.on_input("é"), SuggestEffect::Cancel);
    }

    #[test]
    fn superseded_timer_is_ignored() {
        let mut engine = SuggestionEngine::new();
        let SuggestEffect::Schedule { generation: old, .. } = engine.on_input("va") else {
            unreachable!("should schedule");
        };
        let _ = engine.on_input("vac");
        assert_eq!(engine.on_timer(old, "va".into()), SuggestEffect::None);
        assert!(!engine.is_loading());
    }

    #[test]
    fn fire_sets_loading_and_response_clears_it() {
        let mut engine = SuggestionEngine::new();
        let (seq, token) = schedule_and_fire(&mut engine, "vacc");
        assert_eq!(token, "vacc");
        assert!(engine.is_loading());

        assert!(engine.on_response(seq, Ok(vec!["vaccine".into(), "vaccination".into()])));
        assert!(!engine.is_loading());
        assert!(engine.is_open());
        assert_eq!(engine.suggestions(), ["vaccine", "vaccination"]);
        assert_eq!(engine.suggestion(1), Some("vaccination"));
    }

    #[test]
    fn empty_response_closes_list() {
        let mut engine = SuggestionEngine::new();
        let (seq, _) = schedule_and_fire(&mut engine, "vacc");
        assert!(engine.on_response(seq, Ok(vec!["vaccine".into()])));
        let (seq, _) = schedule_and_fire(&mut engine, "vaccx");
        assert!(engine.on_response(seq, Ok(vec![])));
        assert!(!engine.is_open());
    }

    #[test]
    fn failure_is_swallowed_and_closes_list() {
        let mut engine = SuggestionEngine::new();
        let (seq, _) = schedule_and_fire(&mut engine, "vacc");
        assert!(engine.on_response(seq, Ok(vec!["vaccine".into()])));

        let (seq, _) = schedule_and_fire(&mut engine, "vacci");
        assert!(engine.on_response(seq, Err(ApiError::Status { status: 500 })));
        assert!(!engine.is_open());
        assert!(!engine.is_loading());
    }

    #[test]
    fn slower_superseded_response_never_overwrites_newer() {
        let mut engine = SuggestionEngine::new();
        let (old_seq, _) = schedule_and_fire(&mut engine, "va");
        let (new_seq, _) = schedule_and_fire(&mut engine, "vac");

        assert!(engine.on_response(new_seq, Ok(vec!["vaccine".into()])));
        assert!(!engine.on_response(old_seq, Ok(vec!["various".into()])));
        assert_eq!(engine.suggestions(), ["vaccine"]);
    }

    #[test]
    fn loading_stays_set_while_latest_request_is_outstanding() {
        let mut engine = SuggestionEngine::new();
        let (old_seq, _) = schedule_and_fire(&mut engine, "va");
        let (_new_seq, _) = schedule_and_fire(&mut engine, "vac");

        assert!(!engine.on_response(old_seq, Ok(vec!["various".into()])));
        assert!(engine.is_loading());
        assert!(!engine.is_open());
    }

    #[test]
    fn shortening_token_invalidates_in_flight_request() {
        let mut engine = SuggestionEngine::new();
        let (seq, _) = schedule_and_fire(&mut engine, "vac");
        assert_eq!(engine.on_input("v"), SuggestEffect::Cancel);
        assert!(!engine.is_loading());
        assert!(!engine.on_response(seq, Ok(vec!["vaccine".into()])));
        assert!(!engine.is_open());
    }

    #[test]
    fn dismiss_clears_and_cancels() {
        let mut engine = SuggestionEngine::new();
        let (seq, _) = schedule_and_fire(&mut engine, "vac");
        assert!(engine.on_response(seq, Ok(vec!["vaccine".into()])));

        let SuggestEffect::Schedule { generation, token, .. } = engine.on_input("vacc") else {
            unreachable!("should schedule");
        };
        assert_eq!(engine.dismiss(), SuggestEffect::Cancel);
        assert!(!engine.is_open());
        assert_eq!(engine.on_timer(generation, token), SuggestEffect::None);
    }
}
