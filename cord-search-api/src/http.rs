//! Shared HTTP client construction for ranking service requests.

use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// User-Agent sent when the config does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("cord-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] configured for the ranking service.
///
/// The client has:
/// - Timeout from config
/// - The configured User-Agent, or [`DEFAULT_USER_AGENT`]
/// - gzip decompression
///
/// # Errors
///
/// Returns [`ApiError::Http`] if the client cannot be constructed.
pub fn build_client(config: &ApiConfig) -> Result<reqwest::Client, ApiError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| ApiError::Http(format!("failed to build HTTP client: {e}")))
}

/// Percent-encode a query value the way browsers' `encodeURIComponent` does.
pub fn encode_query(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_with_default_config() {
        let config = ApiConfig::default();
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn build_client_with_custom_ua() {
        let config = ApiConfig {
            user_agent: Some("LabHarness/2.0".into()),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn default_user_agent_names_the_client() {
        assert!(DEFAULT_USER_AGENT.starts_with("cord-search/"));
    }

    #[test]
    fn encode_query_uses_percent_twenty_for_spaces() {
        assert_eq!(encode_query("sars AND cov-2"), "sars%20AND%20cov-2");
        assert_eq!(encode_query("a&b=c"), "a%26b%3Dc");
    }
}
