//! # cord-search-api
//!
//! Typed client for the CORD-19 ranking service.
//!
//! The service exposes two read endpoints:
//!
//! - `GET {base}/search?q=<wire query>` returning `{ "results": [...] }`
//! - `GET {base}/autocomplete?q=<token>` returning `{ "suggestions": [...] }`
//!
//! This crate only moves bytes and types. Debouncing, ordering of
//! responses, and presentation belong to the `cord-search` controller.
//!
//! ## Security
//!
//! - No network listeners; this is a client library
//! - Queries are logged only at trace level

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use backend::SearchBackend;
pub use client::HttpBackend;
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use types::{AutocompleteResponse, SearchResponse, SearchResult};

/// Run a single search against the service described by `config`.
///
/// Builds a throwaway [`HttpBackend`]; long-lived callers should construct
/// one backend and reuse it.
///
/// # Errors
///
/// Returns [`ApiError::Config`] for an invalid config, and otherwise the
/// same errors as [`SearchBackend::search`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> cord_search_api::Result<()> {
/// let config = cord_search_api::ApiConfig::default();
/// let results = cord_search_api::search("vaccine AND efficacy", &config).await?;
/// for result in &results {
///     println!("{:.2} {}", result.score, result.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(wire_query: &str, config: &ApiConfig) -> Result<Vec<SearchResult>> {
    let backend = HttpBackend::new(config.clone())?;
    backend.search(wire_query).await
}

/// Fetch completions for `token` against the service described by `config`.
///
/// # Errors
///
/// Same as [`search`].
pub async fn autocomplete(token: &str, config: &ApiConfig) -> Result<Vec<String>> {
    let backend = HttpBackend::new(config.clone())?;
    backend.autocomplete(token).await
}
