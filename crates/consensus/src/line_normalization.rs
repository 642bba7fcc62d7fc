//! Cross-line normalization for spread and total markets (§4.3 step 2).
//!
//! Books rarely quote the exchange's exact line. Treat the bettable
//! quantity (final margin, final total) as a location family and shift
//! a book's cover probability along a Student-t score by the line gap,
//! scaled by a line-dependent dispersion.

use crate::error::{ConsensusError, Result};
use algo_trade_core::MarketKind;
use algo_trade_numerics::{t_cdf, t_inv_cdf};

fn spread_sigma(target_line: f64) -> f64 {
    let magnitude = target_line.abs();
    if magnitude <= 3.0 {
        10.5
    } else if magnitude <= 7.0 {
        11.5
    } else {
        12.5
    }
}

fn total_sigma(target_line: f64) -> f64 {
    if target_line < 215.0 {
        15.5
    } else if target_line <= 230.0 {
        17.0
    } else {
        18.5
    }
}

/// Shifts `p_book` (the book's cover/over probability at its own line)
/// to the exchange's `target` line. `book` and `target` must be the same
/// [`MarketKind`] variant (`Spread` or `Total`); a mismatch or a
/// non-line-based variant is a caller error.
///
/// Sign convention: for spreads, a less-negative home-spread target is
/// easier for home, so the shift grows with `(L_target - L_book)`. For
/// totals, a lower target is easier for the over, so the shift grows
/// with `(L_book - L_target)`.
///
/// # Errors
/// Returns [`ConsensusError::NotLineBased`] for moneyline/prop markets,
/// or propagates a numerics error from the t-distribution calls.
pub fn normalize_cross_line(p_book: f64, book: MarketKind, target: MarketKind) -> Result<f64> {
    let df = target.line_normalization_df().ok_or_else(|| ConsensusError::NotLineBased(target.label().to_string()))?;

    let shift = match (book, target) {
        (MarketKind::Spread(book_line), MarketKind::Spread(target_line)) => {
            (target_line - book_line) / spread_sigma(target_line)
        }
        (MarketKind::Total(book_line), MarketKind::Total(target_line)) => {
            (book_line - target_line) / total_sigma(target_line)
        }
        _ => return Err(ConsensusError::NotLineBased(target.label().to_string())),
    };

    let t_book = t_inv_cdf(p_book, df)?;
    let p_target = t_cdf(t_book + shift, df)?;
    Ok(p_target.clamp(0.01, 0.99))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_lines_leave_probability_unchanged() {
        let p = normalize_cross_line(0.55, MarketKind::Spread(-3.5), MarketKind::Spread(-3.5)).unwrap();
        assert!((p - 0.55).abs() < 1e-6);
    }

    #[test]
    fn less_negative_home_spread_target_is_easier_for_home() {
        let at_book_line = normalize_cross_line(0.5, MarketKind::Spread(-3.5), MarketKind::Spread(-3.5)).unwrap();
        let at_easier_target = normalize_cross_line(0.5, MarketKind::Spread(-3.5), MarketKind::Spread(-1.5)).unwrap();
        assert!(at_easier_target > at_book_line);
    }

    #[test]
    fn lower_total_target_is_easier_for_over() {
        let at_book_line = normalize_cross_line(0.5, MarketKind::Total(220.0), MarketKind::Total(220.0)).unwrap();
        let at_easier_target = normalize_cross_line(0.5, MarketKind::Total(220.0), MarketKind::Total(210.0)).unwrap();
        assert!(at_easier_target > at_book_line);
    }

    #[test]
    fn moneyline_is_rejected() {
        let err = normalize_cross_line(0.5, MarketKind::Moneyline, MarketKind::Moneyline);
        assert!(err.is_err());
    }

    #[test]
    fn output_is_clamped_to_bounds() {
        let p = normalize_cross_line(0.99, MarketKind::Spread(-20.0), MarketKind::Spread(3.0)).unwrap();
        assert!(p <= 0.99);
        let p = normalize_cross_line(0.01, MarketKind::Spread(3.0), MarketKind::Spread(-20.0)).unwrap();
        assert!(p >= 0.01);
    }

    #[test]
    fn sigma_tiers_match_spec_breakpoints() {
        assert_eq!(spread_sigma(2.0), 10.5);
        assert_eq!(spread_sigma(5.0), 11.5);
        assert_eq!(spread_sigma(10.0), 12.5);
        assert_eq!(total_sigma(200.0), 15.5);
        assert_eq!(total_sigma(225.0), 17.0);
        assert_eq!(total_sigma(240.0), 18.5);
    }
}
