//! cord-search: interactive search client for the CORD-19 research corpus.
//!
//! The crate provides the client-side interaction controller for a remote
//! ranking service:
//!
//! - **Query composition**: match-any (`OR`) or match-all (`AND`) wire queries
//! - **Autocomplete**: debounced, token-aware suggestions with stale-response
//!   suppression
//! - **Keyboard navigation**: highlight, select and dismiss over the open
//!   suggestion list
//! - **Search sessions**: loading, error, retry, reset and elapsed time
//! - **Pagination**: fixed-size pages with a compact page window
//!
//! # Architecture
//!
//! Each component is a plain state object whose transitions return effects.
//! [`runtime::SearchRuntime`] owns them all on one tokio task, runs the
//! debounce timer and network calls, and feeds completions back as events.
//! Front ends drive it through [`runtime::RuntimeHandle`] directly or over the
//! newline-delimited JSON protocol in [`host`].

pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod host;
pub mod navigator;
pub mod paginate;
pub mod query;
pub mod runtime;
pub mod sequence;
pub mod session;
pub mod suggest;

pub use config::ClientConfig;
pub use controller::{Command, Effect, SearchController, Snapshot};
pub use error::{ClientError, Result};
pub use navigator::{KeyboardNavigator, NavKey, Region};
pub use paginate::{PAGE_SIZE, ResultsPaginator};
pub use query::{SearchMode, compose};
pub use runtime::{RuntimeHandle, SearchRuntime, runtime_channel, spawn_runtime};
pub use session::{SearchSessionController, SessionPhase};
pub use suggest::SuggestionEngine;
