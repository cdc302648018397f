//! The interaction controller: one object owning the input text and every
//! component, driven by [`Command`]s and asynchronous completions.
//!
//! Nothing here touches a timer or the network. Each transition returns the
//! [`Effect`]s the caller must carry out; `crate::runtime` does that on a
//! tokio task and feeds the results back in.

use std::time::Duration;

use cord_search_api::{ApiError, SearchResult};
use serde::Serialize;
use tokio::time::Instant;

use crate::display::{ResultCard, page_cards, summary_line};
use crate::navigator::{KeyboardNavigator, NavKey, NavOutcome, Region};
use crate::paginate::{PageMarker, ResultsPaginator};
use crate::query::{SearchMode, replace_last_token};
use crate::sequence::RequestSeq;
use crate::session::{SearchRequest, SearchSessionController, SessionPhase};
use crate::suggest::{SuggestEffect, SuggestionEngine};

/// Something the user (or a host on their behalf) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetInput(String),
    Key(NavKey),
    Click { x: u16, y: u16 },
    SetRegion(Region),
    SelectSuggestion(usize),
    Submit,
    SetMode(SearchMode),
    NextPage,
    PrevPage,
    GotoPage(usize),
    Retry,
    Reset,
    /// Change nothing; used to read the current state.
    Snapshot,
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CancelDebounce,
    /// Restart the debounce timer, then call
    /// [`SearchController::on_debounce_elapsed`].
    ScheduleDebounce {
        generation: u64,
        token: String,
        delay: Duration,
    },
    /// Call the autocomplete endpoint, then [`SearchController::on_suggestions`].
    FetchSuggestions { seq: RequestSeq, token: String },
    /// Call the search endpoint, then [`SearchController::on_search_finished`].
    Search(SearchRequest),
}

/// Result of applying one [`Command`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    pub effects: Vec<Effect>,
    /// The host must suppress the default action of the key it reported.
    pub prevent_default: bool,
}

impl Applied {
    fn effects(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            prevent_default: false,
        }
    }
}

/// Current page as a front end renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub current_page: usize,
    pub total_pages: usize,
    pub window: Vec<PageMarker>,
    pub items: Vec<ResultCard>,
}

/// Everything a front end needs to redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub input: String,
    pub mode: SearchMode,
    pub suggestions: Vec<String>,
    pub suggestions_open: bool,
    pub suggestions_loading: bool,
    /// `-1` when nothing is highlighted.
    pub highlighted_index: i64,
    pub phase: SessionPhase,
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub elapsed_ms: Option<f64>,
    pub total_count: usize,
    pub can_retry: bool,
    pub summary: Option<String>,
    pub page: PageView,
}

#[derive(Debug, Default)]
pub struct SearchController {
    input: String,
    suggestions: SuggestionEngine,
    navigator: KeyboardNavigator,
    session: SearchSessionController,
    paginator: ResultsPaginator,
}

impl SearchController {
    #[must_use]
    pub fn new(mode: SearchMode) -> Self {
        Self {
            session: SearchSessionController::new(mode),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn suggestions(&self) -> &SuggestionEngine {
        &self.suggestions
    }

    #[must_use]
    pub fn navigator(&self) -> &KeyboardNavigator {
        &self.navigator
    }

    #[must_use]
    pub fn session(&self) -> &SearchSessionController {
        &self.session
    }

    #[must_use]
    pub fn paginator(&self) -> &ResultsPaginator {
        &self.paginator
    }

    pub fn apply(&mut self, command: Command, now: Instant) -> Applied {
        match command {
            Command::SetInput(text) => {
                self.input = text;
                self.navigator.on_input_changed();
                let effect = self.suggestions.on_input(&self.input);
                self.navigator.sync(self.suggestions.suggestions().len());
                Applied::effects(effect_list(effect))
            }
            Command::Key(key) => {
                let len = self.suggestions.suggestions().len();
                let outcome = self.navigator.handle_key(key, len);
                let mut applied = self.on_nav_outcome(outcome, now);
                applied.prevent_default = outcome.prevents_default();
                applied
            }
            Command::Click { x, y } => {
                let outcome = self.navigator.handle_click(x, y);
                self.on_nav_outcome(outcome, now)
            }
            Command::SetRegion(region) => {
                self.navigator.set_region(region);
                Applied::default()
            }
            Command::SelectSuggestion(index) => {
                let len = self.suggestions.suggestions().len();
                let outcome = self.navigator.select(index, len);
                self.on_nav_outcome(outcome, now)
            }
            Command::Submit => Applied::effects(self.submit(now)),
            Command::SetMode(mode) => {
                self.session.set_mode(mode);
                Applied::default()
            }
            Command::NextPage => {
                self.paginator.next();
                Applied::default()
            }
            Command::PrevPage => {
                self.paginator.prev();
                Applied::default()
            }
            Command::GotoPage(page) => {
                self.paginator.goto(page);
                Applied::default()
            }
            Command::Retry => match self.session.retry(now) {
                Some(request) => Applied::effects(vec![self.begin_search(request)]),
                None => Applied::default(),
            },
            Command::Reset => {
                self.session.reset();
                self.paginator.reset();
                Applied::effects(self.dismiss_suggestions())
            }
            Command::Snapshot => Applied::default(),
        }
    }

    /// The debounce timer scheduled under `generation` fired.
    pub fn on_debounce_elapsed(&mut self, generation: u64, token: String) -> Vec<Effect> {
        effect_list(self.suggestions.on_timer(generation, token))
    }

    /// An autocomplete request finished. Returns whether state changed.
    pub fn on_suggestions(
        &mut self,
        seq: RequestSeq,
        outcome: Result<Vec<String>, ApiError>,
    ) -> bool {
        if !self.suggestions.on_response(seq, outcome) {
            return false;
        }
        self.navigator.sync(self.suggestions.suggestions().len());
        true
    }

    /// A search request finished. Returns whether state changed.
    pub fn on_search_finished(
        &mut self,
        seq: RequestSeq,
        outcome: Result<Vec<SearchResult>, ApiError>,
        finished_at: Instant,
    ) -> bool {
        if !self.session.on_response(seq, outcome, finished_at) {
            return false;
        }
        self.paginator
            .on_results_replaced(self.session.session().results.len());
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let live = self.session.session();
        let phase = self.session.phase();
        let page = self.paginator.page(&live.results);

        Snapshot {
            input: self.input.clone(),
            mode: self.session.mode(),
            suggestions: self.suggestions.suggestions().to_vec(),
            suggestions_open: self.suggestions.is_open() && self.navigator.is_open(),
            suggestions_loading: self.suggestions.is_loading(),
            highlighted_index: self
                .navigator
                .highlighted()
                .and_then(|i| i64::try_from(i).ok())
                .unwrap_or(-1),
            phase,
            query: live.query.clone(),
            loading: live.loading,
            error: live.error.clone(),
            elapsed_ms: live.elapsed_ms,
            total_count: live.total_count,
            can_retry: self.session.can_retry(),
            summary: summary_line(phase, live),
            page: PageView {
                current_page: page.current_page,
                total_pages: page.total_pages,
                items: page_cards(&page),
                window: page.window,
            },
        }
    }

    fn on_nav_outcome(&mut self, outcome: NavOutcome, now: Instant) -> Applied {
        match outcome {
            NavOutcome::Select(index) => Applied::effects(self.accept_suggestion(index)),
            NavOutcome::Submit => Applied::effects(self.submit(now)),
            NavOutcome::Dismissed => Applied::effects(self.dismiss_suggestions()),
            NavOutcome::Highlighted(_) | NavOutcome::Unhandled => Applied::default(),
        }
    }

    fn accept_suggestion(&mut self, index: usize) -> Vec<Effect> {
        if let Some(choice) = self.suggestions.suggestion(index) {
            tracing::debug!(index, "suggestion accepted");
            self.input = replace_last_token(&self.input, choice);
        }
        self.dismiss_suggestions()
    }

    fn submit(&mut self, now: Instant) -> Vec<Effect> {
        let Some(request) = self.session.submit(&self.input, now) else {
            return Vec::new();
        };
        let mut effects = self.dismiss_suggestions();
        effects.push(self.begin_search(request));
        effects
    }

    /// The session just cleared its results; keep the paginator in step.
    fn begin_search(&mut self, request: SearchRequest) -> Effect {
        self.paginator
            .on_results_replaced(self.session.session().results.len());
        Effect::Search(request)
    }

    fn dismiss_suggestions(&mut self) -> Vec<Effect> {
        let effect = self.suggestions.dismiss();
        self.navigator.sync(0);
        effect_list(effect)
    }
}

fn effect_list(effect: SuggestEffect) -> Vec<Effect> {
    let effect = match effect {
        SuggestEffect::None => return Vec::new(),
        SuggestEffect::Cancel => Effect::CancelDebounce,
        SuggestEffect::Schedule {
            generation,
            token,
            delay,
        } => Effect::ScheduleDebounce {
            generation,
            token,
            delay,
        },
        SuggestEffect::Fetch { seq, token } => Effect::FetchSuggestions { seq, token },
    };
    vec![effect]
}
