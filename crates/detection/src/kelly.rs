//! Fee-aware Kelly sizing (§4.5 step 6).

use algo_trade_arbitrage::fee;

/// Fee-aware Kelly fraction, scaled by `kelly_fraction_config` (the
/// engine's fractional-Kelly dial, typically 0.25). Returns 0 when the
/// fee-adjusted net odds `b_net` are non-positive — the bet has no edge
/// worth sizing.
#[must_use]
pub fn kelly_fraction(p: f64, price: f64, kelly_fraction_config: f64) -> f64 {
    let f = fee(price);
    let b_net = (1.0 - price - f) / (price + f);
    if b_net <= 0.0 {
        return 0.0;
    }
    let raw_kelly = ((p * b_net) - (1.0 - p)) / b_net;
    raw_kelly.clamp(0.0, 1.0) * kelly_fraction_config
}

/// Converts a Kelly fraction into a contract count against `bankroll_dollars`,
/// honoring an optional hard dollar cap. Each contract costs `price`
/// dollars.
#[must_use]
pub fn kelly_to_contracts(
    kelly_fraction: f64,
    bankroll_dollars: f64,
    price: f64,
    max_bet_dollars: Option<f64>,
) -> u32 {
    if price <= 0.0 {
        return 0;
    }
    let mut stake = kelly_fraction * bankroll_dollars;
    if let Some(cap) = max_bet_dollars {
        stake = stake.min(cap);
    }
    (stake / price).floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_edge_at_fair_price_yields_no_stake() {
        let k = kelly_fraction(0.5, 0.5, 0.25);
        assert!(k <= 1e-9);
    }

    #[test]
    fn positive_edge_yields_positive_kelly() {
        let k = kelly_fraction(0.65, 0.5, 0.25);
        assert!(k > 0.0);
    }

    #[test]
    fn kelly_fraction_config_scales_output() {
        let quarter = kelly_fraction(0.65, 0.5, 0.25);
        let full = kelly_fraction(0.65, 0.5, 1.0);
        assert!((quarter - full / 4.0).abs() < 1e-9);
    }

    #[test]
    fn contracts_respect_max_bet_cap() {
        let contracts = kelly_to_contracts(1.0, 10_000.0, 0.5, Some(100.0));
        assert_eq!(contracts, 200);
    }

    #[test]
    fn contracts_without_cap_scale_with_bankroll() {
        let contracts = kelly_to_contracts(0.1, 1_000.0, 0.5, None);
        assert_eq!(contracts, 200);
    }
}
