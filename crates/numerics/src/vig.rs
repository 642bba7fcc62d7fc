//! American-odds conversion and vig (overround) removal.
//!
//! Sportsbooks quote American odds that imply a probability sum above 1
//! (the vig, or "juice"). These helpers convert American odds to implied
//! probabilities and then remove the vig via two methods: a simple
//! proportional rescale, and a power transform that corrects
//! favorite-longshot bias by solving `a^k + b^k = 1`.

use crate::bisect::bisect;
use crate::error::{NumericsError, Result};

/// Converts American odds to an implied probability.
///
/// Positive odds (e.g. `+150`) imply `100 / (odds + 100)`. Negative odds
/// (e.g. `-200`) imply `-odds / (-odds + 100)`. Odds of exactly `0` are
/// not a valid American quote.
///
/// # Errors
/// Returns [`NumericsError::InvalidProbability`] if `odds == 0`.
pub fn american_odds_to_prob(odds: i32) -> Result<f64> {
    if odds == 0 {
        return Err(NumericsError::InvalidProbability(0.0));
    }
    if odds > 0 {
        Ok(100.0 / (f64::from(odds) + 100.0))
    } else {
        let abs_odds = f64::from(-odds);
        Ok(abs_odds / (abs_odds + 100.0))
    }
}

/// Removes vig by proportionally rescaling both sides so they sum to 1:
/// `a' = a/(a+b)`, `b' = b/(a+b)`.
///
/// # Errors
/// Returns [`NumericsError::InvalidVigInput`] if either input is `<= 0`.
pub fn vig_multiplicative(a: f64, b: f64) -> Result<(f64, f64)> {
    if a <= 0.0 || b <= 0.0 {
        return Err(NumericsError::InvalidVigInput { a, b });
    }
    let sum = a + b;
    Ok((a / sum, b / sum))
}

/// Removes vig by solving `a^k + b^k = 1` for `k` and returning
/// `(a^k, b^k)`. Corrects favorite-longshot bias, unlike the
/// proportional method.
///
/// Solved by bisection on `k in (0.01, 10)`, terminating when
/// `|a^k + b^k - 1| < 1e-9` or after 100 iterations. When `a + b` is
/// already (approximately) 1, returns `(a, b)` unchanged.
///
/// # Errors
/// Returns [`NumericsError::InvalidVigInput`] if either input is `<= 0`.
/// Returns [`NumericsError::VigNotConverged`] if bisection exhausts its
/// iteration budget without meeting tolerance.
pub fn vig_power(a: f64, b: f64) -> Result<(f64, f64)> {
    if a <= 0.0 || b <= 0.0 {
        return Err(NumericsError::InvalidVigInput { a, b });
    }
    if (a + b - 1.0).abs() < 1e-9 {
        return Ok((a, b));
    }

    let result = bisect(|k| a.powf(k) + b.powf(k), 0.01, 10.0, 1.0, 1e-9, 100);

    if !result.converged {
        return Err(NumericsError::VigNotConverged { iterations: result.iterations });
    }

    let k = result.value;
    Ok((a.powf(k), b.powf(k)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorite_odds_convert_correctly() {
        // -200 implies 200/300 = 0.6667
        let p = american_odds_to_prob(-200).unwrap();
        assert!((p - 0.6667).abs() < 1e-3);
    }

    #[test]
    fn underdog_odds_convert_correctly() {
        // +150 implies 100/250 = 0.4
        let p = american_odds_to_prob(150).unwrap();
        assert!((p - 0.4).abs() < 1e-9);
    }

    #[test]
    fn zero_odds_rejected() {
        assert!(american_odds_to_prob(0).is_err());
    }

    #[test]
    fn multiplicative_sums_to_one() {
        let (a, b) = vig_multiplicative(0.55, 0.50).unwrap();
        assert!((a + b - 1.0).abs() < 1e-9);
        assert!((a - 0.55 / 1.05).abs() < 1e-9);
    }

    #[test]
    fn multiplicative_rejects_non_positive() {
        assert!(vig_multiplicative(0.0, 0.5).is_err());
        assert!(vig_multiplicative(0.5, -0.1).is_err());
    }

    #[test]
    fn power_sums_to_one() {
        let (a, b) = vig_power(0.55, 0.52).unwrap();
        assert!((a + b - 1.0).abs() < 1e-9, "a={a} b={b} sum={}", a + b);
    }

    #[test]
    fn power_identity_when_already_fair() {
        let (a, b) = vig_power(0.6, 0.4).unwrap();
        assert_eq!(a, 0.6);
        assert_eq!(b, 0.4);
    }

    #[test]
    fn power_rejects_non_positive() {
        assert!(vig_power(0.0, 0.5).is_err());
        assert!(vig_power(-0.1, 0.5).is_err());
    }

    #[test]
    fn power_favorite_longshot_correction_differs_from_multiplicative() {
        // A heavily lopsided book (big favorite) should see power and
        // multiplicative methods diverge meaningfully.
        let (pow_a, _) = vig_power(0.90, 0.20).unwrap();
        let (mult_a, _) = vig_multiplicative(0.90, 0.20).unwrap();
        assert!((pow_a - mult_a).abs() > 1e-4);
    }
}
