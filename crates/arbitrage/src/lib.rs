//! Single-exchange YES/NO arbitrage detection for binary prediction
//! markets.
//!
//! A binary market's order book only ever carries resting bids on both
//! the YES and NO side; each side's ask is the complement of the other
//! side's bid (`ask = 100 - bid`). Two risk-free shapes fall out of that
//! derived-ask relationship:
//!
//! - **Pure arbitrage**: buying both the YES and NO ask nets a guaranteed
//!   profit when their combined cost plus fees is under 100 cents.
//! - **Position arbitrage**: a position already held on one side can be
//!   hedged by buying the opposite side's ask when doing so locks in a
//!   profit regardless of the outcome.
//!
//! # Modules
//!
//! - [`types`]: the [`types::Side`] of a binary market.
//! - [`fees`]: the exchange's taker fee formula.
//! - [`detector`]: pure and position arbitrage detection.

pub mod detector;
pub mod fees;
pub mod types;

pub use detector::{ArbitrageDetector, DetectorConfig, PositionArbOpportunity, PureArbOpportunity};
pub use fees::{fee, FeeCalculator, FeeConfig};
pub use types::Side;
