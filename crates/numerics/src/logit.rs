//! Logit/sigmoid transforms and logit-space winsorization.

/// Natural-log odds of `p`. Clamps `p` to `[1e-9, 1 - 1e-9]` first so the
/// transform never produces `±inf` for degenerate inputs.
#[must_use]
pub fn logit(p: f64) -> f64 {
    let clamped = p.clamp(1e-9, 1.0 - 1e-9);
    (clamped / (1.0 - clamped)).ln()
}

/// Inverse of [`logit`].
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Winsorizes a slice of logits about their median at `±k * sigma_rob`,
/// where `sigma_rob = 1.2533 * MAD` (mean absolute deviation from the
/// median, scaled to be a consistent estimator of the standard deviation
/// under normality).
///
/// Identity when fewer than 3 entries are supplied, per spec boundary
/// behavior.
#[must_use]
pub fn winsorize_logits(logits: &[f64], k: f64) -> Vec<f64> {
    if logits.len() < 3 {
        return logits.to_vec();
    }

    let median = median(logits);
    let mad: f64 = logits.iter().map(|x| (x - median).abs()).sum::<f64>() / logits.len() as f64;
    let sigma_rob = 1.2533 * mad;

    if sigma_rob <= 0.0 {
        return logits.to_vec();
    }

    let lower = median - k * sigma_rob;
    let upper = median + k * sigma_rob;
    logits.iter().map(|&x| x.clamp(lower, upper)).collect()
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Weight-averaged logit pool, mapped back through the sigmoid.
///
/// `values` and `weights` must be the same length and non-empty; weights
/// need not sum to 1 (they are normalized here).
#[must_use]
pub fn weighted_logit_pool(values: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), weights.len());
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return sigmoid(values.iter().sum::<f64>() / values.len().max(1) as f64);
    }
    let weighted: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / weight_sum;
    sigmoid(weighted)
}
