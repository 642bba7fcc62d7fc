//! Orchestrates §4.3 steps 1-4 for game-level markets: per-book vig
//! removal, cross-line normalization, log-linear pooling, and the
//! book-count/freshness bookkeeping the rest of the engine relies on.

use crate::error::{ConsensusError, Result};
use crate::line_normalization::normalize_cross_line;
use crate::pooling::pool_probabilities;
use crate::types::Consensus;
use algo_trade_core::{vendor_weight, BookQuote, MarketKind};
use algo_trade_numerics::{american_odds_to_prob, vig_power};
use chrono::{DateTime, Utc};

fn same_family(a: MarketKind, b: MarketKind) -> bool {
    matches!(
        (a, b),
        (MarketKind::Moneyline, MarketKind::Moneyline)
            | (MarketKind::Spread(_), MarketKind::Spread(_))
            | (MarketKind::Total(_), MarketKind::Total(_))
    )
}

fn is_fresh(quote: &BookQuote, freshness_bound: Option<chrono::Duration>, now: DateTime<Utc>) -> bool {
    match (quote.updated_at, freshness_bound) {
        (Some(ts), Some(bound)) => now.signed_duration_since(ts) <= bound,
        _ => true,
    }
}

/// Builds a [`Consensus`] for one game-level market from the books that
/// quoted it.
///
/// `quotes` need not all carry the same line for `Spread`/`Total` — each
/// is normalized against `target.market_kind`'s line before pooling.
/// `exchange_raw_prob_a` is the exchange's own implied probability for
/// side A, read off its current ask.
///
/// # Errors
/// Returns [`ConsensusError::NoValidBooks`] if no quote survives family
/// and freshness filtering, or propagates a numerics error from vig
/// removal or cross-line normalization.
pub fn build_game_consensus(
    quotes: &[BookQuote],
    target_market: MarketKind,
    exchange_raw_prob_a: f64,
    freshness_bound: Option<chrono::Duration>,
    now: DateTime<Utc>,
) -> Result<Consensus> {
    let mut probs = Vec::with_capacity(quotes.len());
    let mut weights = Vec::with_capacity(quotes.len());

    for quote in quotes {
        if !same_family(quote.market_kind, target_market) || !is_fresh(quote, freshness_bound, now) {
            continue;
        }

        let raw_a = american_odds_to_prob(quote.side_a_odds)?;
        let raw_b = american_odds_to_prob(quote.side_b_odds)?;
        let (fair_a, _fair_b) = vig_power(raw_a, raw_b)?;

        let p_a = match target_market {
            MarketKind::Moneyline => fair_a,
            MarketKind::Spread(_) | MarketKind::Total(_) => {
                normalize_cross_line(fair_a, quote.market_kind, target_market)?
            }
            MarketKind::Prop { .. } => {
                return Err(ConsensusError::NotLineBased("prop markets use build_prop_consensus".to_string()))
            }
        };

        probs.push(p_a);
        weights.push(vendor_weight(&quote.book_name));
    }

    if probs.is_empty() {
        return Err(ConsensusError::NoValidBooks);
    }

    let book_count = probs.len() as u32;
    let pooled_a = pool_probabilities(&probs, &weights);

    Ok(Consensus::new(target_market, None, pooled_a, book_count, exchange_raw_prob_a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(book: &str, market_kind: MarketKind, side_a_odds: i32, side_b_odds: i32) -> BookQuote {
        BookQuote { book_name: book.to_string(), market_kind, side_a_odds, side_b_odds, updated_at: None }
    }

    #[test]
    fn moneyline_consensus_pools_multiple_books() {
        let quotes = vec![
            quote("pinnacle", MarketKind::Moneyline, -150, 130),
            quote("draftkings", MarketKind::Moneyline, -140, 120),
            quote("fanduel", MarketKind::Moneyline, -145, 125),
        ];
        let consensus = build_game_consensus(&quotes, MarketKind::Moneyline, 0.58, None, Utc::now()).unwrap();
        assert_eq!(consensus.book_count, 3);
        assert!(consensus.true_prob_a > 0.55 && consensus.true_prob_a < 0.65);
        assert!((consensus.true_prob_a + consensus.true_prob_b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn spread_consensus_normalizes_across_lines() {
        let quotes = vec![
            quote("pinnacle", MarketKind::Spread(-3.0), -110, -110),
            quote("draftkings", MarketKind::Spread(-3.5), -108, -112),
        ];
        let consensus = build_game_consensus(&quotes, MarketKind::Spread(-3.0), 0.5, None, Utc::now()).unwrap();
        assert_eq!(consensus.book_count, 2);
    }

    #[test]
    fn mismatched_family_quotes_are_excluded() {
        let quotes = vec![quote("pinnacle", MarketKind::Total(220.0), -110, -110)];
        let err = build_game_consensus(&quotes, MarketKind::Moneyline, 0.5, None, Utc::now());
        assert!(matches!(err, Err(ConsensusError::NoValidBooks)));
    }

    #[test]
    fn stale_quotes_are_filtered_out() {
        let stale = DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let quotes =
            vec![BookQuote { updated_at: Some(stale), ..quote("pinnacle", MarketKind::Moneyline, -150, 130) }];
        let err = build_game_consensus(&quotes, MarketKind::Moneyline, 0.5, Some(chrono::Duration::seconds(60)), Utc::now());
        assert!(matches!(err, Err(ConsensusError::NoValidBooks)));
    }

    #[test]
    fn missing_timestamp_is_treated_as_fresh() {
        let quotes = vec![quote("pinnacle", MarketKind::Moneyline, -150, 130)];
        let consensus =
            build_game_consensus(&quotes, MarketKind::Moneyline, 0.5, Some(chrono::Duration::seconds(60)), Utc::now())
                .unwrap();
        assert_eq!(consensus.book_count, 1);
    }
}
