//! Client configuration with sensible defaults.
//!
//! [`ApiConfig`] names the service root and controls request behaviour. It
//! is injected once at construction; nothing in this crate reads global
//! state to find the service.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Default service root used by the reference ranking server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Configuration for the ranking service client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service root. `/search` and `/autocomplete` are resolved against it.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, `cord-search/<version>` is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_seconds: 10,
            user_agent: None,
        }
    }
}

impl ApiConfig {
    /// Build a config for `base_url` with every other field defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `base_url` must be a non-empty, absolute `http` or `https` URL
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), ApiError> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::Config("base_url must not be empty".into()));
        }
        let parsed = url::Url::parse(trimmed)
            .map_err(|e| ApiError::Config(format!("base_url is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base_url must use http or https, got {}",
                parsed.scheme()
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ApiError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
