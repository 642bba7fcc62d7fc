//! Order-book depth analysis: walking a derived ask book to estimate the
//! average fill price for a requested size, and searching for the
//! largest size that still clears a slippage budget (§4.6).
//!
//! [`Orderbook`] only stores resting bids; the ask levels this module
//! walks are always the *derived* `yes_asks()`/`no_asks()` views, never
//! raw bid levels, since a taker buys against the opposite side's bids.

use crate::types::{Orderbook, PriceLevel};
use serde::{Deserialize, Serialize};

/// The outcome of walking an ask book for a requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillEstimate {
    pub requested: u32,
    pub filled: u32,
    /// Quantity-weighted average price in cents. `0.0` if nothing filled.
    pub avg_price_cents: f64,
    /// Best (first) level's price in cents, for slippage reference.
    pub best_price_cents: u32,
    /// The worst (highest) price actually consumed to fill this size —
    /// the limit price an IOC order needs to guarantee the fill.
    pub worst_price_cents: u32,
    /// `(avg - best) / best`, floored at 0 for rounding noise.
    pub slippage_pct: f64,
}

impl FillEstimate {
    /// Acceptable iff the full request filled and slippage is within
    /// `max_slippage_pct` (§4.6).
    #[must_use]
    pub fn is_acceptable(&self, max_slippage_pct: f64) -> bool {
        self.filled == self.requested && self.filled > 0 && self.slippage_pct <= max_slippage_pct
    }
}

/// Walks `levels` (assumed already sorted best-first, i.e. ascending
/// price for a buy) consuming up to `requested` contracts, accumulating
/// `quantity * price` and the filled count.
#[must_use]
pub fn walk_book(levels: &[PriceLevel], requested: u32) -> FillEstimate {
    let best_price_cents = levels.first().map_or(0, |l| l.price);

    let mut filled = 0u32;
    let mut cost = 0.0f64;
    let mut worst_price_cents = best_price_cents;
    for level in levels {
        if filled >= requested {
            break;
        }
        let take = level.count.min(requested - filled);
        if take > 0 {
            worst_price_cents = level.price;
        }
        cost += f64::from(take) * f64::from(level.price);
        filled += take;
    }

    let avg_price_cents = if filled > 0 { cost / f64::from(filled) } else { 0.0 };
    let slippage_pct = if best_price_cents > 0 && filled > 0 {
        ((avg_price_cents - f64::from(best_price_cents)) / f64::from(best_price_cents)).max(0.0)
    } else {
        0.0
    };

    FillEstimate { requested, filled, avg_price_cents, best_price_cents, worst_price_cents, slippage_pct }
}

/// Estimates the fill for buying `requested` YES contracts against the
/// derived YES ask book.
#[must_use]
pub fn estimate_yes_buy(book: &Orderbook, requested: u32) -> FillEstimate {
    walk_book(&book.yes_asks(), requested)
}

/// Estimates the fill for buying `requested` NO contracts against the
/// derived NO ask book.
#[must_use]
pub fn estimate_no_buy(book: &Orderbook, requested: u32) -> FillEstimate {
    walk_book(&book.no_asks(), requested)
}

/// Binary search over `1..=total_depth(levels)` for the largest quantity
/// whose slippage still clears `max_slippage_pct`. Always permits at
/// least the best-price level's quantity if that alone meets the
/// budget, since a single level by definition has zero slippage.
#[must_use]
pub fn optimal_size(levels: &[PriceLevel], max_slippage_pct: f64) -> u32 {
    let total_depth: u32 = levels.iter().map(|l| l.count).sum();
    if total_depth == 0 {
        return 0;
    }

    let best_level_depth = levels.first().map_or(0, |l| l.count);
    if walk_book(levels, best_level_depth).slippage_pct > max_slippage_pct {
        // Even the best level alone doesn't fit (shouldn't happen since a
        // single level has zero slippage, but guards div-by-zero inputs).
        return 0;
    }

    let mut lo = best_level_depth;
    let mut hi = total_depth;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        let estimate = walk_book(levels, mid);
        if estimate.filled == mid && estimate.slippage_pct <= max_slippage_pct {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn book() -> Orderbook {
        // NO bids at 40/35/30 cents (10 each) derive YES asks at 60/65/70.
        Orderbook {
            ticker: "KXTEST-TEST".to_string(),
            yes_bids: vec![],
            no_bids: vec![
                PriceLevel { price: 40, count: 10 },
                PriceLevel { price: 35, count: 10 },
                PriceLevel { price: 30, count: 10 },
            ],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn slippage_scenario_matches_spec_worked_example() {
        let estimate = estimate_yes_buy(&book(), 20);
        assert_eq!(estimate.best_price_cents, 60);
        assert_eq!(estimate.worst_price_cents, 65);
        assert!((estimate.avg_price_cents - 62.5).abs() < 1e-9, "avg={}", estimate.avg_price_cents);
        assert!((estimate.slippage_pct - 0.041_666_67).abs() < 1e-6, "slippage={}", estimate.slippage_pct);
        assert!(!estimate.is_acceptable(0.02));
    }

    #[test]
    fn optimal_size_returns_just_the_best_level() {
        let book = book();
        let size = optimal_size(&book.yes_asks(), 0.02);
        assert_eq!(size, 10);
    }

    #[test]
    fn full_depth_fits_a_generous_budget() {
        let book = book();
        let size = optimal_size(&book.yes_asks(), 0.20);
        assert_eq!(size, 30);
    }

    #[test]
    fn empty_book_returns_zero_fillable_and_unacceptable() {
        let empty = Orderbook {
            ticker: "KXTEST-EMPTY".to_string(),
            yes_bids: vec![],
            no_bids: vec![],
            timestamp: Utc::now(),
        };
        let estimate = estimate_yes_buy(&empty, 10);
        assert_eq!(estimate.filled, 0);
        assert!(!estimate.is_acceptable(0.02));
        assert_eq!(optimal_size(&empty.yes_asks(), 0.02), 0);
    }

    #[test]
    fn partial_fill_is_unacceptable_even_within_slippage() {
        let single_level = Orderbook {
            ticker: "KXTEST-THIN".to_string(),
            yes_bids: vec![],
            no_bids: vec![PriceLevel { price: 40, count: 5 }],
            timestamp: Utc::now(),
        };
        let estimate = estimate_yes_buy(&single_level, 10);
        assert_eq!(estimate.filled, 5);
        assert!(!estimate.is_acceptable(0.02));
    }

    #[test]
    fn full_fill_within_budget_is_acceptable() {
        let estimate = estimate_yes_buy(&book(), 10);
        assert!(estimate.is_acceptable(0.02));
    }
}
