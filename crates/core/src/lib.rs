//! Shared domain types, configuration, and process-lifetime state for the
//! prediction-market trading engine.
//!
//! This crate is the one every other crate in the workspace depends on: it
//! carries the market taxonomy ([`domain`]), the validated application
//! configuration ([`config`], [`config_loader`]), and the handful of
//! process-lifetime collaborators that live outside any single scan
//! (alert deduplication, the maintenance-window check, retry/backoff for
//! outbound HTTP, the vendor weight table, player-name matching, and
//! ticker construction). The scan loop itself lives in the `cli` crate,
//! which is the one place allowed to depend on every other crate at once.

pub mod alert;
pub mod config;
pub mod config_loader;
pub mod domain;
pub mod games_cache;
pub mod maintenance;
pub mod playername;
pub mod position;
pub mod retry;
pub mod ticker;
pub mod vendor;

pub use alert::{Alert, AlertDeduper, AlertSeverity};
pub use config::{AppConfig, ConfigError, Credentials, DatabaseConfig, EngineConfig, ServerConfig};
pub use config_loader::ConfigLoader;
pub use domain::{
    BookQuote, GameIdentity, MarketKind, PlayerIdentity, PlayerPropQuote, PropType, ScanSummary,
    SemanticSide,
};
pub use games_cache::{Game, GameStatus, GamesCache};
pub use maintenance::is_maintenance_window;
pub use playername::normalize_and_match;
pub use position::{Position, PositionStore, PositionStoreError};
pub use retry::{retry_with_backoff, Retryable, RetryPolicy};
pub use ticker::{build_ticker, TickerSeries};
pub use vendor::{vendor_weight, VendorTier};
