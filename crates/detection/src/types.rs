//! [`OpportunityCandidate`], the output of the detection pipeline (§3).

use algo_trade_core::{GameIdentity, MarketKind, PlayerIdentity, SemanticSide};
use serde::{Deserialize, Serialize};

/// Quantitative and sizing knobs the detection pipeline needs (the
/// subset of `algo_trade_core::EngineConfig` it reads).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub ev_threshold: f64,
    pub kelly_fraction: f64,
    pub min_book_count: u32,
    pub max_bet_dollars: Option<f64>,
}

/// One tradeable edge found during a scan (§3, §4.5). Invariant:
/// `adjusted_ev >= scaled threshold` and `kelly_fraction >= 0` are
/// enforced by construction — [`crate::candidate::evaluate`] only
/// returns a candidate once both hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityCandidate {
    pub game: GameIdentity,
    pub player: Option<PlayerIdentity>,
    pub market_kind: MarketKind,
    pub side: SemanticSide,
    pub true_probability: f64,
    pub exchange_ask_prob: f64,
    pub raw_ev: f64,
    pub adjusted_ev: f64,
    pub kelly_fraction: f64,
    pub book_count: u32,
    pub ticker: Option<String>,
}
