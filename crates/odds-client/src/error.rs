//! Error types for the odds-aggregator HTTP client.

use thiserror::Error;

/// Errors that can occur when interacting with the odds aggregator.
#[derive(Debug, Error)]
pub enum OddsClientError {
    /// Network-level failure (connection, DNS, etc).
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit { retry_after_secs: u64 },

    /// Non-2xx response.
    #[error("API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    /// Response body didn't deserialize into the expected shape.
    #[error("malformed response: {0}")]
    Serialization(String),

    /// Configuration error (missing API key, invalid base URL).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl OddsClientError {
    #[must_use]
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api { status_code, message: message.into() }
    }

    #[must_use]
    pub fn rate_limit(retry_after_secs: u64) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// Whether this error is worth retrying at all.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. })
            || matches!(self, Self::Api { status_code, .. } if *status_code >= 500)
    }

    /// Suggested retry delay in seconds, if applicable.
    #[must_use]
    pub fn retry_delay_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after_secs } => Some(*retry_after_secs),
            Self::Network(_) | Self::Timeout(_) => Some(1),
            Self::Api { status_code, .. } if *status_code >= 500 => Some(2),
            _ => None,
        }
    }
}

impl algo_trade_core::Retryable for OddsClientError {
    fn is_retryable(&self) -> bool {
        self.is_retryable()
    }

    fn retry_delay(&self) -> Option<std::time::Duration> {
        self.retry_delay_secs().map(std::time::Duration::from_secs)
    }
}

impl From<reqwest::Error> for OddsClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OddsClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OddsClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_is_retryable_with_its_own_delay() {
        let err = OddsClientError::rate_limit(30);
        assert!(err.is_retryable());
        assert_eq!(err.retry_delay_secs(), Some(30));
    }

    #[test]
    fn server_error_is_retryable() {
        let err = OddsClientError::api(503, "unavailable");
        assert!(err.is_retryable());
    }

    #[test]
    fn client_error_is_not_retryable() {
        let err = OddsClientError::api(400, "bad request");
        assert!(!err.is_retryable());
        assert_eq!(err.retry_delay_secs(), None);
    }
}
