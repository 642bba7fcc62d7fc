//! Orchestrates §4.5 steps 1-6: book-count gate, shrinkage, scaled
//! threshold, EV, and Kelly sizing, producing an [`OpportunityCandidate`]
//! only when every gate clears.

use crate::ev::adjusted_ev as compute_adjusted_ev;
use crate::ev::raw_ev as compute_raw_ev;
use crate::kelly::kelly_fraction as compute_kelly_fraction;
use crate::shrinkage::{scaled_ev_threshold, shrink_toward_exchange};
use crate::types::{DetectionConfig, OpportunityCandidate};
use algo_trade_consensus::Consensus;
use algo_trade_core::{GameIdentity, SemanticSide};

/// `true_prob_a` belongs to `Home`/`Over`; `true_prob_b` to `Away`/`Under`
/// (the same A/B convention `BookQuote` and `Consensus` use throughout).
fn consensus_prob_for_side(consensus: &Consensus, side: SemanticSide) -> f64 {
    match side {
        SemanticSide::Home | SemanticSide::Over => consensus.true_prob_a,
        SemanticSide::Away | SemanticSide::Under => consensus.true_prob_b,
    }
}

/// Evaluates one (game, side) pair against its consensus. `price` is the
/// exchange's current ask for `side`, as a fraction of $1 — both the
/// trading price and the exchange's own probability prior for shrinkage
/// (§4.5 step 2).
///
/// Returns `None` at the first gate that fails: book count, price
/// bounds, or the scaled EV threshold. Ticker resolution is the caller's
/// job (it needs the exchange's ticker-construction rules, §6) — pass
/// `None` here and set it after if the candidate is accepted.
#[must_use]
pub fn evaluate(
    consensus: &Consensus,
    game: GameIdentity,
    side: SemanticSide,
    price: f64,
    config: &DetectionConfig,
    bankroll_dollars: f64,
) -> Option<OpportunityCandidate> {
    if consensus.book_count < config.min_book_count {
        tracing::debug!(book_count = consensus.book_count, min = config.min_book_count, "below minimum book count");
        return None;
    }
    if !(0.0..1.0).contains(&price) {
        tracing::debug!(price, "exchange ask outside (0,1)");
        return None;
    }

    let p_consensus = consensus_prob_for_side(consensus, side);
    let p_star = shrink_toward_exchange(p_consensus, price, consensus.book_count);
    let threshold = scaled_ev_threshold(config.ev_threshold, consensus.book_count);

    let raw_ev = compute_raw_ev(p_star, price);
    let adjusted_ev = compute_adjusted_ev(p_star, price);

    if adjusted_ev < threshold {
        tracing::debug!(adjusted_ev, threshold, "below scaled EV threshold");
        return None;
    }

    let kelly_fraction = compute_kelly_fraction(p_star, price, config.kelly_fraction);
    let _ = bankroll_dollars; // contract sizing happens downstream via kelly::kelly_to_contracts

    Some(OpportunityCandidate {
        game,
        player: None,
        market_kind: consensus.market_kind,
        side,
        true_probability: p_star,
        exchange_ask_prob: price,
        raw_ev,
        adjusted_ev,
        kelly_fraction,
        book_count: consensus.book_count,
        ticker: None,
    })
}
