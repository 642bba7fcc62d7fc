//! The fused output of the consensus pipeline (§3).

use algo_trade_core::{MarketKind, PlayerIdentity};
use serde::{Deserialize, Serialize};

/// A single game+market's fused probabilities, built once per scan and
/// never mutated. `player` is set only for [`MarketKind::Prop`] markets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consensus {
    pub market_kind: MarketKind,
    pub player: Option<PlayerIdentity>,
    /// Fused probability of the "home"/"over" side.
    pub true_prob_a: f64,
    /// Fused probability of the "away"/"under" side. Always `1.0 -
    /// true_prob_a`; kept explicit because downstream code reads it
    /// without recomputing.
    pub true_prob_b: f64,
    /// Number of books that contributed after freshness/family
    /// filtering (§4.3 step 4).
    pub book_count: u32,
    /// The exchange's own implied probability for side A, read off its
    /// current ask — the comparison point opportunity detection needs.
    pub exchange_raw_prob_a: f64,
}

impl Consensus {
    /// # Panics
    /// In debug builds, if the probability invariants (0 < p < 1, p_a +
    /// p_b == 1) are violated — these are programming errors in the
    /// pooling math, not recoverable input problems.
    #[must_use]
    pub fn new(
        market_kind: MarketKind,
        player: Option<PlayerIdentity>,
        true_prob_a: f64,
        book_count: u32,
        exchange_raw_prob_a: f64,
    ) -> Self {
        debug_assert!(true_prob_a > 0.0 && true_prob_a < 1.0, "true_prob_a out of range: {true_prob_a}");
        Self {
            market_kind,
            player,
            true_prob_a,
            true_prob_b: 1.0 - true_prob_a,
            book_count,
            exchange_raw_prob_a,
        }
    }
}
