//! HTTP implementation of [`SearchBackend`] for the ranking service.

use serde::de::DeserializeOwned;

use crate::backend::SearchBackend;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{build_client, encode_query};
use crate::types::{AutocompleteResponse, SearchResponse, SearchResult};

/// Path of the ranked search endpoint, relative to the base URL.
pub const SEARCH_PATH: &str = "search";
/// Path of the autocomplete endpoint, relative to the base URL.
pub const AUTOCOMPLETE_PATH: &str = "autocomplete";

/// Talks to the ranking service over HTTP.
///
/// Cheap to share behind an `Arc`; the inner [`reqwest::Client`] pools
/// connections across both endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpBackend {
    /// Validate `config` and build the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] for an invalid config, or
    /// [`ApiError::Http`] if the client cannot be constructed.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    /// The configuration this backend was built from.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Full request URL for `path` with `q` percent-encoded.
    pub fn request_url(&self, path: &str, q: &str) -> String {
        format!("{}?q={}", self.config.endpoint(path), encode_query(q))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, q: &str) -> Result<T, ApiError> {
        let url = self.request_url(path, q);
        tracing::trace!(%url, "sending request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "non-success status");
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl SearchBackend for HttpBackend {
    async fn search(&self, wire_query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let response: SearchResponse = self.get_json(SEARCH_PATH, wire_query).await?;
        tracing::debug!(count = response.results.len(), "search returned results");
        Ok(response.results)
    }

    async fn autocomplete(&self, token: &str) -> Result<Vec<String>, ApiError> {
        let response: AutocompleteResponse = self.get_json(AUTOCOMPLETE_PATH, token).await?;
        Ok(response.suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_config() {
        let err = HttpBackend::new(ApiConfig::with_base_url("")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn request_url_encodes_query() {
        let backend =
            HttpBackend::new(ApiConfig::with_base_url("http://localhost:5000/")).expect("valid");
        assert_eq!(
            backend.request_url(SEARCH_PATH, "vaccine efficacy"),
            "http://localhost:5000/search?q=vaccine%20efficacy"
        );
        assert_eq!(
            backend.request_url(AUTOCOMPLETE_PATH, "cov-2"),
            "http://localhost:5000/autocomplete?q=cov-2"
        );
    }

    #[test]
    fn config_accessor_returns_original() {
        let config = ApiConfig::with_base_url("https://papers.example.org");
        let backend = HttpBackend::new(config.clone()).expect("valid");
        assert_eq!(backend.config(), &config);
    }
}
