//! Negative binomial PMF/survival, parameterized by mean `mu` and
//! dispersion `r` (variance = mu + mu^2/r).

use crate::beta::regularized_incomplete_beta;
use crate::bisect::bisect;
use crate::error::{NumericsError, Result};
use crate::gamma::ln_gamma;

/// `P(X = k)` for `NegBin(mu, r)`.
///
/// # Errors
/// Returns [`NumericsError::InvalidNegBinParams`] if `mu <= 0` or `r <= 0`.
pub fn pmf(k: u32, mu: f64, r: f64) -> Result<f64> {
    if mu <= 0.0 || r <= 0.0 {
        return Err(NumericsError::InvalidNegBinParams { mu, r });
    }
    let k = f64::from(k);
    let log_pmf = ln_gamma(k + r) - ln_gamma(r) - ln_gamma(k + 1.0)
        + r * (r / (r + mu)).ln()
        + k * (mu / (r + mu)).ln();
    Ok(log_pmf.exp())
}

/// `P(X >= k)` for `NegBin(mu, r)`, via
/// `1 - I_{r/(r+mu)}(r, k)`. `k = 0` is the boundary case and always
/// returns 1.
///
/// # Errors
/// Returns [`NumericsError::InvalidNegBinParams`] if `mu <= 0` or `r <= 0`.
pub fn survival(k: u32, mu: f64, r: f64) -> Result<f64> {
    if mu <= 0.0 || r <= 0.0 {
        return Err(NumericsError::InvalidNegBinParams { mu, r });
    }
    if k == 0 {
        return Ok(1.0);
    }
    let x = r / (r + mu);
    Ok(1.0 - regularized_incomplete_beta(r, f64::from(k), x))
}

/// Infers `mu` such that `survival(k, mu, r) ≈ target_p`, by bisection on
/// `mu` in `(0.1, 100)`, 100 iterations, tolerance `1e-3`.
///
/// # Errors
/// Propagates [`NumericsError::InvalidNegBinParams`] if `r <= 0`.
pub fn infer_mean(k: u32, target_p: f64, r: f64) -> Result<f64> {
    if r <= 0.0 {
        return Err(NumericsError::InvalidNegBinParams { mu: 0.0, r });
    }

    let result = bisect(
        |mu| survival(k, mu, r).unwrap_or(0.0),
        0.1,
        100.0,
        target_p,
        1e-3,
        100,
    );

    Ok(result.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survival_at_zero_is_one() {
        assert_eq!(survival(0, 9.5, 3.3).unwrap(), 1.0);
    }

    #[test]
    fn survival_decreases_in_k() {
        let mut last = 1.1;
        for k in 0..30 {
            let value = survival(k, 10.0, 3.3).unwrap();
            assert!(value <= last + 1e-9, "k={k}");
            last = value;
        }
    }

    #[test]
    fn infer_mean_round_trips_within_half() {
        for mu in [1.0, 5.0, 10.0, 20.0, 40.0] {
            let r = 3.3;
            let p = survival(mu.round() as u32, mu, r).unwrap();
            let inferred = infer_mean(mu.round() as u32, p, r).unwrap();
            assert!((inferred - mu).abs() < 0.5, "mu={mu} inferred={inferred}");
        }
    }

    #[test]
    fn rejects_non_positive_params() {
        assert!(pmf(1, 0.0, 3.0).is_err());
        assert!(survival(1, 5.0, -1.0).is_err());
    }

    #[test]
    fn pmf_sums_close_to_one_over_truncated_support() {
        let mu = 9.5;
        let r = 3.3;
        let total: f64 = (0..200).map(|k| pmf(k, mu, r).unwrap()).sum();
        assert!((total - 1.0).abs() < 1e-3, "total={total}");
    }
}
