//! Application configuration, covering every option enumerated in §6:
//! EV threshold, Kelly fraction, poll interval, book-count floor,
//! slippage budget, liquidity floor, bet cap, execution toggles, and
//! credentials for both upstream HTTP APIs.
//!
//! Validation failures here are the one class of fatal startup error:
//! everything downstream assumes a validated [`AppConfig`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub engine: EngineConfig,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the embedded sqlite database file holding positions.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "data/positions.sqlite3".to_string() }
    }
}

/// The quantitative and scheduling knobs from §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base adjusted-EV bar a candidate must clear (§4.5 step 4).
    #[serde(default = "default_ev_threshold")]
    pub ev_threshold: f64,

    /// Scaling applied to full Kelly (§4.5 step 6).
    #[serde(default = "default_kelly_fraction")]
    pub kelly_fraction: f64,

    /// Interval between scan ticks. Enforced minimum 10ms.
    #[serde(default = "default_poll_interval_ms", with = "duration_millis")]
    pub poll_interval: Duration,

    /// Minimum contributing book count before a consensus is trusted
    /// outright (§4.5 step 1, §4.3 step 4).
    #[serde(default = "default_min_book_count")]
    pub min_book_count: u32,

    /// Maximum acceptable walk-the-book slippage (§4.6).
    #[serde(default = "default_max_slippage_pct")]
    pub max_slippage_pct: f64,

    /// Minimum contract count a candidate must clear after sizing
    /// (§4.8 step 4).
    #[serde(default = "default_min_liquidity_contracts")]
    pub min_liquidity_contracts: u32,

    /// Hard per-trade cap in dollars, if any.
    #[serde(default)]
    pub max_bet_dollars: Option<f64>,

    /// When `false`, the engine only emits alerts and never submits
    /// orders (§4.9 step 3, §7).
    #[serde(default)]
    pub auto_execute: bool,

    /// Routes the exchange client to its demo environment.
    #[serde(default)]
    pub demo_mode: bool,

    /// Freshness bound for book quotes; `None` disables the filter
    /// (§4.3 stale-data policy).
    #[serde(default)]
    pub book_freshness_secs: Option<i64>,

    /// Alert dedup cooldown (§12).
    #[serde(default = "default_alert_cooldown_secs")]
    pub alert_cooldown_secs: i64,

    /// Games-slate cache TTL (§4.9 step 1, §5).
    #[serde(default = "default_games_cache_ttl_secs")]
    pub games_cache_ttl_secs: i64,
}

fn default_ev_threshold() -> f64 {
    0.03
}
fn default_kelly_fraction() -> f64 {
    0.25
}
fn default_poll_interval_ms() -> Duration {
    Duration::from_secs(2)
}
fn default_min_book_count() -> u32 {
    4
}
fn default_max_slippage_pct() -> f64 {
    0.02
}
fn default_min_liquidity_contracts() -> u32 {
    10
}
fn default_alert_cooldown_secs() -> i64 {
    300
}
fn default_games_cache_ttl_secs() -> i64 {
    300
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        (value.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ev_threshold: default_ev_threshold(),
            kelly_fraction: default_kelly_fraction(),
            poll_interval: default_poll_interval_ms(),
            min_book_count: default_min_book_count(),
            max_slippage_pct: default_max_slippage_pct(),
            min_liquidity_contracts: default_min_liquidity_contracts(),
            max_bet_dollars: None,
            auto_execute: false,
            demo_mode: false,
            book_freshness_secs: None,
            alert_cooldown_secs: default_alert_cooldown_secs(),
            games_cache_ttl_secs: default_games_cache_ttl_secs(),
        }
    }
}

/// Exchange and sportsbook credentials. The private key is accepted in
/// PKCS#8 or PKCS#1 PEM form; `algo_trade_kalshi::KalshiAuth` handles
/// parsing either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub exchange_key_id: String,
    pub exchange_private_key_pem: String,
    pub sportsbook_api_key: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config validation failed: {0}")]
    Validation(String),
    #[error("failed to load configuration: {0}")]
    Load(String),
}

impl AppConfig {
    /// Validates cross-field invariants not expressible in `serde`
    /// defaults alone. The only fatal error class at startup (§7).
    ///
    /// # Errors
    /// Returns [`ConfigError::Validation`] if any bound is violated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.poll_interval < Duration::from_millis(10) {
            return Err(ConfigError::Validation(
                "poll_interval must be at least 10ms".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.engine.ev_threshold) {
            return Err(ConfigError::Validation("ev_threshold must be in [0, 1)".to_string()));
        }
        if !(0.0..=1.0).contains(&self.engine.kelly_fraction) {
            return Err(ConfigError::Validation("kelly_fraction must be in [0, 1]".to_string()));
        }
        if !(0.0..1.0).contains(&self.engine.max_slippage_pct) {
            return Err(ConfigError::Validation("max_slippage_pct must be in [0, 1)".to_string()));
        }
        if self.engine.min_book_count == 0 {
            return Err(ConfigError::Validation("min_book_count must be >= 1".to_string()));
        }
        if let Some(cap) = self.engine.max_bet_dollars {
            if cap <= 0.0 {
                return Err(ConfigError::Validation("max_bet_dollars must be > 0 if set".to_string()));
            }
        }
        if self.credentials.exchange_key_id.trim().is_empty() {
            return Err(ConfigError::Validation("exchange_key_id must not be empty".to_string()));
        }
        Ok(())
    }
}
