//! Sizing and result types for the execution controller (§4.8).

use algo_trade_core::position::Leg;
use serde::{Deserialize, Serialize};

/// The subset of `algo_trade_core::EngineConfig` the controller reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Unscaled EV threshold, re-checked against the actual fill price
    /// (§4.8 step 7) rather than the book-count-scaled threshold
    /// detection used to admit the candidate in the first place.
    pub ev_threshold: f64,
    pub max_slippage_pct: f64,
    pub min_liquidity_contracts: u32,
    pub max_bet_dollars: Option<f64>,
    /// Fractional-Kelly dial used to re-size at the actual fill price
    /// (§4.8 step 6). Same value detection used to size the candidate in
    /// the first place.
    pub kelly_fraction_config: f64,
}

impl From<&algo_trade_core::EngineConfig> for ExecutionConfig {
    fn from(engine: &algo_trade_core::EngineConfig) -> Self {
        Self {
            ev_threshold: engine.ev_threshold,
            max_slippage_pct: engine.max_slippage_pct,
            min_liquidity_contracts: engine.min_liquidity_contracts,
            max_bet_dollars: engine.max_bet_dollars,
            kelly_fraction_config: engine.kelly_fraction,
        }
    }
}

/// The outcome of a single submitted leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub ticker: String,
    pub leg: Leg,
    pub requested_contracts: u32,
    pub filled_contracts: u32,
    pub avg_fill_price: f64,
    pub order_id: String,
    pub position_id: i64,
}

/// The outcome of executing both legs of a pure arbitrage pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbExecutionResult {
    pub yes: ExecutionResult,
    pub no: ExecutionResult,
}

/// What `ExecutionController::execute_candidate` actually submitted.
/// Usually a single directional fill, but §4.8 step 3 switches a
/// candidate over to the pure-arbitrage path when the exchange already
/// holds the opposite side and an arb is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CandidateOutcome {
    Directional(ExecutionResult),
    Arbitrage(ArbExecutionResult),
}
