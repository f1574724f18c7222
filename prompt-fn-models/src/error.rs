//! Generation backend error types.
//!
//! [`ModelError`] is the call failure of a generation backend. Variants that
//! come from an HTTP exchange keep the raw response body so callers can try to
//! salvage output from it.

use std::time::Duration;
use thiserror::Error;

/// Generation backend errors.
#[derive(Debug, Error)]
pub enum ModelError {
    /// HTTP error from the API.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// API-level error reported inside a successful exchange.
    #[error("API error: {message}")]
    Api {
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// The response could not be decoded.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What went wrong while decoding.
        message: String,
        /// Raw response body, when one was received.
        body: Option<String>,
    },

    /// Request timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Rate limited by the API.
    #[error("Rate limited")]
    RateLimited {
        /// Response body.
        body: String,
    },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not found.
    #[error("Model not found: {0}")]
    NotFound(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The model refused or the content filter triggered.
    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModelError {
    /// Stable name of the error kind, used for log correlation.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http_error",
            Self::Api { .. } => "api_error",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::Timeout(_) => "timeout",
            Self::RateLimited { .. } => "rate_limited",
            Self::Authentication(_) => "authentication",
            Self::NotFound(_) => "not_found",
            Self::Connection(_) => "connection",
            Self::ContentFiltered(_) => "content_filtered",
            Self::Configuration(_) => "configuration",
            Self::Other(_) => "other",
        }
    }

    /// Raw response body carried by this failure, if any.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } | Self::RateLimited { body } => Some(body),
            Self::InvalidResponse { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::RateLimited { .. } | Self::Connection(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            code: None,
        }
    }

    /// Create an API error with code.
    pub fn api_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Create an HTTP error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid response error without a body.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            body: None,
        }
    }

    /// Create an invalid response error keeping the raw body.
    pub fn invalid_response_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::Timeout(Duration::from_secs(30))
        } else if err.is_connect() {
            ModelError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ModelError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ModelError::Other(err.into())
        }
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(ModelError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(ModelError::Connection("failed".into()).is_retryable());
        assert!(ModelError::http(502, "Bad gateway").is_retryable());

        assert!(!ModelError::http(400, "Bad request").is_retryable());
        assert!(!ModelError::auth("Invalid key").is_retryable());
        assert!(!ModelError::api("Error").is_retryable());
    }

    #[test]
    fn test_response_body() {
        assert_eq!(ModelError::http(500, "{\"output\":[]}").response_body(), Some("{\"output\":[]}"));
        assert_eq!(
            ModelError::invalid_response_with_body("missing field", "raw").response_body(),
            Some("raw")
        );
        assert_eq!(ModelError::invalid_response("eof").response_body(), None);
        assert_eq!(ModelError::api("boom").response_body(), None);
    }

    #[test]
    fn test_kind_and_display() {
        let err = ModelError::api_with_code("Something went wrong", "server_error");
        assert_eq!(err.kind(), "api_error");
        assert!(err.to_string().contains("Something went wrong"));

        let err = ModelError::http(404, "Not found");
        assert_eq!(err.kind(), "http_error");
        assert!(err.to_string().contains("404"));

        let err = ModelError::from(anyhow::anyhow!("custom"));
        assert_eq!(err.kind(), "other");
        assert_eq!(err.to_string(), "custom");
    }
}
