//! Errors surfaced by the execution controller (§4.8, §7).
//!
//! Every rejection here is a gate that refused to clear, not a transport
//! failure — those are wrapped from the gateway's own error type instead
//! and retried at that layer, not this one.

use algo_trade_core::position::PositionStoreError;
use algo_trade_core::retry::Retryable;
use algo_trade_kalshi::KalshiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The candidate had no ticker resolved by the caller.
    #[error("candidate has no resolved ticker")]
    MissingTicker,

    /// A local position already exists for this `(ticker, leg)`.
    #[error("position already open locally for {ticker} leg {leg}")]
    DuplicatePosition { ticker: String, leg: &'static str },

    /// The exchange already reports a position on this ticker.
    #[error("exchange already reports a position for {ticker}")]
    RemoteDuplicate { ticker: String },

    /// The exchange already holds the opposite side of this ticker and no
    /// pure arbitrage is available to justify adding this leg too.
    #[error("opposite-side position already held on {ticker} and no arbitrage available")]
    ArbitrageConflict { ticker: String },

    /// Kelly sizing against the current bankroll rounds to zero contracts.
    #[error("sized to zero contracts")]
    ZeroSize,

    /// Sized contract count (initial or re-sized at fill price) falls
    /// below `min_liquidity_contracts` (§4.8 steps 4 and 6).
    #[error("sized to {contracts} contracts, below minimum {minimum} for {ticker}")]
    BelowMinimumContracts { ticker: String, contracts: u32, minimum: u32 },

    /// The requested size doesn't fill in full within the slippage
    /// budget (§4.8 step 5).
    #[error("slippage unacceptable on {ticker} at the requested size")]
    SlippageExceeded { ticker: String },

    /// Expected value at the actual fill price no longer clears the base
    /// threshold (§4.8 step 7's re-verification).
    #[error("adjusted EV {adjusted_ev:.4} at fill price below threshold {threshold:.4}")]
    EvBelowThreshold { adjusted_ev: f64, threshold: f64 },

    #[error("position store error: {0}")]
    Store(#[from] PositionStoreError),

    #[error("exchange error: {0}")]
    Exchange(#[from] KalshiError),
}

impl Retryable for ExecutionError {
    /// Only the wrapped exchange error carries transport semantics; every
    /// other variant is a gate decision and retrying it would just fail
    /// again against the same book or the same position.
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Exchange(e) if e.is_retryable())
    }
}
