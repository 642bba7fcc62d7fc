//! Log-linear pooling of per-book probabilities (§4.3 step 3).

use algo_trade_numerics::{logit, weighted_logit_pool, winsorize_logits};

/// Winsorizes `probs` in logit space (identity below 3 entries, `k=2` per
/// spec), then returns the weight-averaged pool mapped back through the
/// sigmoid. `probs` and `weights` must be the same non-empty length.
#[must_use]
pub fn pool_probabilities(probs: &[f64], weights: &[f64]) -> f64 {
    let logits: Vec<f64> = probs.iter().copied().map(logit).collect();
    let winsorized = winsorize_logits(&logits, 2.0);
    weighted_logit_pool(&winsorized, weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_book_pool_returns_its_own_probability() {
        let pooled = pool_probabilities(&[0.6], &[1.0]);
        assert!((pooled - 0.6).abs() < 1e-9);
    }

    #[test]
    fn outlier_book_is_winsorized_before_pooling() {
        let probs = vec![0.5, 0.52, 0.48, 0.99];
        let weights = vec![1.0, 1.0, 1.0, 1.0];
        let pooled = pool_probabilities(&probs, &weights);
        assert!(pooled < 0.7, "outlier should be clamped, got {pooled}");
    }

    #[test]
    fn sharper_book_weight_pulls_pool_toward_it() {
        let probs = vec![0.5, 0.5, 0.5, 0.7, 0.7];
        let equal_weights = vec![1.0; 5];
        let sharp_weighted = vec![1.0, 1.0, 1.0, 3.0, 3.0];
        let equal_pool = pool_probabilities(&probs, &equal_weights);
        let sharp_pool = pool_probabilities(&probs, &sharp_weighted);
        assert!(sharp_pool > equal_pool);
    }
}
