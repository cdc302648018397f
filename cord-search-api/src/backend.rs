//! Trait definition for the ranking service seam.
//!
//! The interactive controller only ever talks to a [`SearchBackend`]. The
//! production implementation is [`crate::client::HttpBackend`]; tests supply
//! in-process fakes.

use crate::error::ApiError;
use crate::types::SearchResult;

/// The two read operations the ranking service exposes.
///
/// All implementations must be `Send + Sync` so requests can be spawned
/// onto the runtime while the controller keeps processing events.
pub trait SearchBackend: Send + Sync {
    /// Run a search for an already-composed wire query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails, the service answers with a
    /// non-success status, or the body cannot be decoded.
    fn search(
        &self,
        wire_query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, ApiError>> + Send;

    /// Fetch completions for a single token, in relevance order.
    ///
    /// # Errors
    ///
    /// Same as [`SearchBackend::search`]. Callers treat any error as "no
    /// suggestions".
    fn autocomplete(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, ApiError>> + Send;
}
