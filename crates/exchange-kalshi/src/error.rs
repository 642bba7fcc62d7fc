//! Error types for Kalshi exchange integration.
//!
//! Provides typed errors for authentication, API communication, validation,
//! and execution failures.

use thiserror::Error;

/// Errors that can occur when interacting with Kalshi.
#[derive(Debug, Error)]
pub enum KalshiError {
    /// Authentication failed.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// RSA signing error.
    #[error("RSA signing error: {0}")]
    Signing(String),

    /// API request failed.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message from API.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Invalid order parameters.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Insufficient balance.
    #[error(
        "insufficient balance: required {required_cents} cents, available {available_cents} cents"
    )]
    InsufficientBalance {
        /// Required amount in cents.
        required_cents: i64,
        /// Available amount in cents.
        available_cents: i64,
    },

    /// Order rejected by exchange.
    #[error("order rejected: {0}")]
    OrderRejected(String),

    /// Order not found.
    #[error("order not found: {order_id}")]
    OrderNotFound {
        /// The order ID that was not found.
        order_id: String,
    },

    /// Market not found.
    #[error("market not found: {ticker}")]
    MarketNotFound {
        /// The market ticker that was not found.
        ticker: String,
    },

    /// Market is closed for trading.
    #[error("market closed: {ticker}")]
    MarketClosed {
        /// The closed market's ticker.
        ticker: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Circuit breaker is open.
    #[error("circuit breaker open: {reason}")]
    CircuitBreakerOpen {
        /// Reason the circuit breaker tripped.
        reason: String,
    },

    /// Daily limit exceeded.
    #[error("daily limit exceeded: {limit_type} - used {used}, max {max}")]
    DailyLimitExceeded {
        /// Type of limit (volume, orders, etc.).
        limit_type: String,
        /// Amount already used.
        used: String,
        /// Maximum allowed.
        max: String,
    },
}

impl KalshiError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a rate limit error.
    pub fn rate_limit(retry_after_secs: u64) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// Creates an insufficient balance error.
    pub fn insufficient_balance(required_cents: i64, available_cents: i64) -> Self {
        Self::InsufficientBalance {
            required_cents,
            available_cents,
        }
    }

    /// Creates an order not found error.
    pub fn order_not_found(order_id: impl Into<String>) -> Self {
        Self::OrderNotFound {
            order_id: order_id.into(),
        }
    }

    /// Creates a market not found error.
    pub fn market_not_found(ticker: impl Into<String>) -> Self {
        Self::MarketNotFound {
            ticker: ticker.into(),
        }
    }

    /// Creates a market closed error.
    pub fn market_closed(ticker: impl Into<String>) -> Self {
        Self::MarketClosed {
            ticker: ticker.into(),
        }
    }

    /// Creates a circuit breaker open error.
    pub fn circuit_breaker_open(reason: impl Into<String>) -> Self {
        Self::CircuitBreakerOpen {
            reason: reason.into(),
        }
    }

    /// Creates a daily limit exceeded error.
    pub fn daily_limit_exceeded(
        limit_type: impl Into<String>,
        used: impl Into<String>,
        max: impl Into<String>,
    ) -> Self {
        Self::DailyLimitExceeded {
            limit_type: limit_type.into(),
            used: used.into(),
            max: max.into(),
        }
    }

    /// Returns true if the error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. }
        )
    }

    /// Returns true if the error indicates the request should be retried later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. } => true,
            Self::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    /// Returns the suggested retry delay in seconds, if applicable.
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

impl algo_trade_core::Retryable for KalshiError {
    fn is_retryable(&self) -> bool {
        self.is_retryable()
    }

    fn retry_delay(&self) -> Option<std::time::Duration> {
        self.retry_delay_secs().map(std::time::Duration::from_secs)
    }
}

impl From<reqwest::Error> for KalshiError {
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

impl From<serde_json::Error> for KalshiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Kalshi operations.
pub type Result<T> = std::result::Result<T, KalshiError>;
