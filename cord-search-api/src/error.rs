//! Error types for the cord-search-api crate.
//!
//! Messages are stable and meant to be shown to users verbatim: the search
//! controller surfaces the `Display` output of these errors directly.

/// Errors that can occur while talking to the ranking service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a non-success HTTP status.
    #[error("search service returned HTTP {status}")]
    Status {
        /// The HTTP status code returned by the service.
        status: u16,
    },

    /// The request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response body was not the expected JSON document.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    /// Classify a [`reqwest::Error`] raised while sending a request.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// Convenience type alias for cord-search-api results.
pub type Result<T> = std::result::Result<T, ApiError>;
