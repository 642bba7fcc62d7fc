//! Single-exchange YES/NO arbitrage detection.
//!
//! A binary market's YES and NO books both quote resting bids; each side's
//! ask is the other side's bid mirrored through `100 - price` (see
//! [`algo_trade_kalshi::Orderbook`]). Two shapes of arbitrage fall out of
//! that:
//!
//! - **Pure arb**: buy both YES and NO at their derived asks. If the
//!   combined cost plus fees is under 100c, the pair is a risk-free profit.
//! - **Position arb**: a position is already held on one side; if the
//!   derived ask on the *other* side is cheap enough that buying it locks
//!   in a profit regardless of outcome, take it.

use algo_trade_kalshi::Orderbook;
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::fees::FeeCalculator;
use crate::types::Side;

/// Thresholds an arbitrage candidate must clear to be reported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum profit per contract, in cents.
    pub min_profit_cents: f64,
    /// Minimum profit as a fraction of cost.
    pub min_profit_pct: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_profit_cents: 0.5,
            min_profit_pct: 0.005,
        }
    }
}

/// A risk-free YES+NO pair on the same market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PureArbOpportunity {
    pub ticker: String,
    pub yes_ask_cents: u32,
    pub no_ask_cents: u32,
    pub profit_cents: f64,
    pub profit_pct: f64,
    pub max_contracts: u32,
}

/// A hedge against an already-held position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionArbOpportunity {
    pub ticker: String,
    pub held_side: Side,
    pub entry_price: f64,
    pub opposite_ask_cents: u32,
    pub profit_cents: f64,
    pub profit_pct: f64,
}

/// Detects YES/NO arbitrage within a single market's order book.
#[derive(Debug)]
pub struct ArbitrageDetector {
    config: DetectorConfig,
    fee_calculator: FeeCalculator,
}

impl Default for ArbitrageDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ArbitrageDetector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DetectorConfig::default(),
            fee_calculator: FeeCalculator::new(),
        }
    }

    #[must_use]
    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            config,
            fee_calculator: FeeCalculator::new(),
        }
    }

    #[must_use]
    pub fn with_config_and_fees(config: DetectorConfig, fee_calculator: FeeCalculator) -> Self {
        Self { config, fee_calculator }
    }

    #[must_use]
    pub fn config(&self) -> DetectorConfig {
        self.config
    }

    #[must_use]
    pub fn fee_calculator(&self) -> FeeCalculator {
        self.fee_calculator
    }

    /// Checks the book for a pure YES+NO arbitrage.
    ///
    /// `profit = 100 - y* - n* - fee(y*/100)*100 - fee(n*/100)*100`, where
    /// `y*` and `n*` are the best derived asks. Admitted iff profit clears
    /// both `min_profit_cents` and `min_profit_pct` of the combined cost.
    #[must_use]
    pub fn detect_pure(&self, book: &Orderbook) -> Option<PureArbOpportunity> {
        let yes_ask = book.best_yes_ask()?;
        let no_ask = book.best_no_ask()?;

        let yes_fee_cents = self.fee_calculator.fee(f64::from(yes_ask) / 100.0) * 100.0;
        let no_fee_cents = self.fee_calculator.fee(f64::from(no_ask) / 100.0) * 100.0;
        let combined_cost = f64::from(yes_ask + no_ask);
        let profit_cents = 100.0 - combined_cost - yes_fee_cents - no_fee_cents;
        let profit_pct = if combined_cost > 0.0 { profit_cents / combined_cost } else { 0.0 };

        trace!(ticker = %book.ticker, yes_ask, no_ask, profit_cents, profit_pct, "pure arb check");

        if profit_cents < self.config.min_profit_cents || profit_pct < self.config.min_profit_pct {
            return None;
        }

        let max_contracts = book.yes_ask_depth().min(book.yes_bid_depth());

        let opp = PureArbOpportunity {
            ticker: book.ticker.clone(),
            yes_ask_cents: yes_ask,
            no_ask_cents: no_ask,
            profit_cents,
            profit_pct,
            max_contracts,
        };

        info!(
            ticker = %opp.ticker,
            profit_cents = opp.profit_cents,
            profit_pct = opp.profit_pct,
            max_contracts = opp.max_contracts,
            "pure arbitrage opportunity"
        );

        Some(opp)
    }

    /// Checks whether a held position can be hedged profitably by buying
    /// the opposite side at its current derived ask.
    ///
    /// `profit = 100 - 100*entry_price - o* - fee(o*/100)*100`, where `o*`
    /// is the derived ask of the side opposite `held_side`. The entry fee
    /// is sunk and not charged again. Admitted against the same two
    /// thresholds as [`Self::detect_pure`], measured against `o*` as the
    /// only new cost.
    #[must_use]
    pub fn detect_position(
        &self,
        book: &Orderbook,
        held_side: Side,
        entry_price: f64,
    ) -> Option<PositionArbOpportunity> {
        let opposite_ask = match held_side {
            Side::Yes => book.best_no_ask()?,
            Side::No => book.best_yes_ask()?,
        };

        let ask_fee_cents = self.fee_calculator.fee(f64::from(opposite_ask) / 100.0) * 100.0;
        let profit_cents = 100.0 - 100.0 * entry_price - f64::from(opposite_ask) - ask_fee_cents;
        let profit_pct = if opposite_ask > 0 { profit_cents / f64::from(opposite_ask) } else { 0.0 };

        trace!(
            ticker = %book.ticker,
            held_side = %held_side,
            entry_price,
            opposite_ask,
            profit_cents,
            profit_pct,
            "position arb check"
        );

        if profit_cents < self.config.min_profit_cents || profit_pct < self.config.min_profit_pct {
            return None;
        }

        let opp = PositionArbOpportunity {
            ticker: book.ticker.clone(),
            held_side,
            entry_price,
            opposite_ask_cents: opposite_ask,
            profit_cents,
            profit_pct,
        };

        info!(
            ticker = %opp.ticker,
            held_side = %opp.held_side,
            profit_cents = opp.profit_cents,
            profit_pct = opp.profit_pct,
            "position arbitrage opportunity"
        );

        Some(opp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algo_trade_kalshi::PriceLevel;
    use chrono::Utc;

    fn book_with(yes_bids: Vec<(u32, u32)>, no_bids: Vec<(u32, u32)>) -> Orderbook {
        Orderbook {
            ticker: "KXTEST-TEST".to_string(),
            yes_bids: yes_bids
                .into_iter()
                .map(|(price, count)| PriceLevel { price, count })
                .collect(),
            no_bids: no_bids
                .into_iter()
                .map(|(price, count)| PriceLevel { price, count })
                .collect(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn pure_arb_found_when_combined_cost_well_under_dollar() {
        // yes ask = 100 - 55 = 45, no ask = 100 - 53 = 47; combined 92c.
        let book = book_with(vec![(53, 100)], vec![(55, 100)]);
        let detector = ArbitrageDetector::new();
        let opp = detector.detect_pure(&book).expect("expected pure arb");
        assert_eq!(opp.yes_ask_cents, 45);
        assert_eq!(opp.no_ask_cents, 47);
        assert!(opp.profit_cents > 0.5);
    }

    #[test]
    fn pure_arb_absent_when_combined_cost_at_dollar() {
        // yes ask = 50, no ask = 50; combined 100c leaves no room after fees.
        let book = book_with(vec![(50, 100)], vec![(50, 100)]);
        let detector = ArbitrageDetector::new();
        assert!(detector.detect_pure(&book).is_none());
    }

    #[test]
    fn pure_arb_max_contracts_is_min_of_both_sides() {
        let book = book_with(vec![(53, 40)], vec![(55, 100)]);
        let detector = ArbitrageDetector::new();
        let opp = detector.detect_pure(&book).unwrap();
        assert_eq!(opp.max_contracts, 40);
    }

    #[test]
    fn position_arb_absent_when_opposite_ask_too_expensive() {
        // Held YES at a high 0.90 entry; opposite (NO) ask derived from the
        // YES bid is still 20c, leaving no room after the entry cost.
        let book = book_with(vec![(80, 100)], vec![(10, 100)]);
        let detector = ArbitrageDetector::new();
        assert!(detector.detect_position(&book, Side::Yes, 0.90).is_none());
    }

    #[test]
    fn position_arb_profitable_hedge() {
        // Held NO at a 0.10 entry; opposite (YES) ask derived from the NO
        // bid of 85c is 15c, well within budget.
        let book = book_with(vec![(5, 100)], vec![(85, 100)]);
        let detector = ArbitrageDetector::new();
        let opp = detector.detect_position(&book, Side::No, 0.10).expect("expected hedge");
        assert_eq!(opp.opposite_ask_cents, 15);
        assert!(opp.profit_cents > 0.5);
    }

    #[test]
    fn detect_pure_returns_none_on_empty_book() {
        let book = book_with(vec![], vec![]);
        let detector = ArbitrageDetector::new();
        assert!(detector.detect_pure(&book).is_none());
    }
}
