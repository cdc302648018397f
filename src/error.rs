//! Error types for the cord-search client.

use cord_search_api::ApiError;

/// Top-level error type for the search client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search service error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// Malformed or unsupported host message.
    #[error("contract error: {0}")]
    Contract(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_display_unwrapped() {
        let err = ClientError::from(ApiError::Status { status: 404 });
        assert_eq!(err.to_string(), "search service returned HTTP 404");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ClientError = io.into();
        assert!(matches!(err, ClientError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: missing");
    }
}
