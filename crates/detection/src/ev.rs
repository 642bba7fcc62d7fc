//! Raw and fee-adjusted expected value (§4.5 step 5).

use algo_trade_arbitrage::fee;

/// `p * (1 - price) - (1 - p) * price`.
#[must_use]
pub fn raw_ev(p: f64, price: f64) -> f64 {
    p * (1.0 - price) - (1.0 - p) * price
}

/// `raw_ev - fee(price)`.
#[must_use]
pub fn adjusted_ev(p: f64, price: f64) -> f64 {
    raw_ev(p, price) - fee(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_edge_yields_positive_raw_ev() {
        assert!(raw_ev(0.6, 0.5) > 0.0);
    }

    #[test]
    fn fair_price_yields_zero_raw_ev() {
        assert!(raw_ev(0.5, 0.5).abs() < 1e-12);
    }

    #[test]
    fn adjusted_ev_is_always_at_most_raw_ev() {
        assert!(adjusted_ev(0.6, 0.5) < raw_ev(0.6, 0.5));
    }
}
