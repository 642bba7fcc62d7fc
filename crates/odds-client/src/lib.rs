//! HTTP client for the sportsbook odds aggregator (§6).
//!
//! Fetches the games slate, per-game book quotes, and player-prop
//! quotes, converting each into the shared domain types `algo_trade_core`
//! defines. Consumers (`algo_trade_consensus`, the `cli` scan loop) never
//! see the wire shapes in [`types`] — those are private to this crate.

mod client;
mod error;
mod types;

pub use client::{OddsClient, OddsClientConfig, ODDS_API_PROD_URL};
pub use error::{OddsClientError, Result};
