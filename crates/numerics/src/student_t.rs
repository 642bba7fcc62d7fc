//! Student-t CDF and its inverse, expressed through the regularized
//! incomplete beta function.

use crate::beta::regularized_incomplete_beta;
use crate::bisect::bisect;
use crate::error::{NumericsError, Result};

/// Student-t CDF at `t` with `df` degrees of freedom.
///
/// `F(t) = 1 - 0.5 * I_x(df/2, 1/2)` for `t > 0`, `F(t) = 0.5 * I_x(df/2,
/// 1/2)` for `t <= 0`, where `x = df / (df + t^2)`.
///
/// # Errors
/// Returns [`NumericsError::InvalidDegreesOfFreedom`] if `df < 1`.
pub fn t_cdf(t: f64, df: f64) -> Result<f64> {
    if df < 1.0 {
        return Err(NumericsError::InvalidDegreesOfFreedom(df));
    }

    let x = df / (df + t * t);
    let half_beta = 0.5 * regularized_incomplete_beta(df / 2.0, 0.5, x);

    Ok(if t > 0.0 { 1.0 - half_beta } else { half_beta })
}

/// Inverse Student-t CDF, found by bisection over `t_cdf` (monotonic in
/// `t`). Searches `t` in `[-1000, 1000]`, 200 iterations, tolerance 1e-10.
///
/// # Errors
/// Propagates [`NumericsError::InvalidDegreesOfFreedom`] from [`t_cdf`].
pub fn t_inv_cdf(p: f64, df: f64) -> Result<f64> {
    if df < 1.0 {
        return Err(NumericsError::InvalidDegreesOfFreedom(df));
    }
    let p = p.clamp(1e-12, 1.0 - 1e-12);

    let result = bisect(
        |t| t_cdf(t, df).unwrap_or(0.5),
        -1000.0,
        1000.0,
        p,
        1e-10,
        200,
    );

    Ok(result.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_at_zero_is_one_half_for_any_df() {
        for df in [1.0, 5.0, 30.0, 100.0] {
            let value = t_cdf(0.0, df).unwrap();
            assert!((value - 0.5).abs() < 1e-9, "df={df}");
        }
    }

    #[test]
    fn round_trip_inverse() {
        for df in [1.0, 5.0, 7.0, 9.0, 30.0] {
            let mut p = 0.05_f64;
            while p < 1.0 {
                let t = t_inv_cdf(p, df).unwrap();
                let back = t_cdf(t, df).unwrap();
                assert!((back - p).abs() < 1e-4, "df={df} p={p} back={back}");
                p += 0.1;
            }
        }
    }

    #[test]
    fn rejects_invalid_degrees_of_freedom() {
        assert!(t_cdf(0.0, 0.5).is_err());
        assert!(t_inv_cdf(0.5, 0.0).is_err());
    }

    #[test]
    fn higher_df_converges_toward_normal() {
        use crate::normal::normal_cdf;
        let t_value = t_cdf(1.0, 10_000.0).unwrap();
        let normal_value = normal_cdf(1.0);
        assert!((t_value - normal_value).abs() < 1e-3);
    }
}
