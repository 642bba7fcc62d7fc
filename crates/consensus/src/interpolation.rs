//! Player-prop distribution interpolation (§4.4).
//!
//! A book's "over L" quote pins one point of a latent per-player
//! distribution. Two families are supported — [`PropType::is_continuous`]
//! selects between them — and both calibrate in two passes because each
//! distribution's own dispersion parameter depends on the mean being
//! solved for.

use crate::error::Result;
use algo_trade_core::{PlayerPropQuote, PropType};
use algo_trade_numerics::{american_odds_to_prob, logit, negbin_infer_mean, negbin_survival, normal_cdf, normal_inv_cdf, sigmoid, vig_power};

/// Overdispersion ratio `r/mu` for each count prop, tuned from sport
/// data (§4.4).
fn negbin_r_over_mu(prop_type: PropType) -> f64 {
    match prop_type {
        PropType::Rebounds => 3.3,
        PropType::Assists => 2.5,
        PropType::Threes => 2.0,
        PropType::Steals => 2.0,
        PropType::Blocks => 1.5,
        PropType::Points => unreachable!("points is continuous, not negative-binomial"),
    }
}

/// `DefaultSD(mu)` for the continuous "points" family (§4.4).
fn default_sd_points(mu: f64) -> f64 {
    if mu <= 15.0 {
        0.40 * mu
    } else if mu <= 25.0 {
        0.35 * mu
    } else {
        0.38 * mu
    }
}

/// Translates a book's "over L" line into the integer threshold a count
/// distribution's survival function expects: a half-integer line means
/// `X >= ceil(L)`; an integer line still excludes the push, so it means
/// `X >= L + 1` (§4.4 threshold semantics).
fn threshold_k(line: f64) -> u32 {
    if (line.fract()).abs() > 1e-9 {
        line.ceil().max(0.0) as u32
    } else {
        (line as u32) + 1
    }
}

fn infer_mu_normal(line_book: f64, p_book: f64, sigma: f64) -> f64 {
    line_book - 0.5 + sigma * normal_inv_cdf(p_book)
}

/// Two-pass Normal calibration for a continuous prop, returning `(mu,
/// sigma)` fit to the book's own line and probability.
fn calibrate_normal(line_book: f64, p_book: f64) -> (f64, f64) {
    let sigma1 = default_sd_points(line_book.max(1.0));
    let mu1 = infer_mu_normal(line_book, p_book, sigma1);
    let sigma2 = default_sd_points(mu1.max(1.0));
    let mu2 = infer_mu_normal(line_book, p_book, sigma2);
    (mu2, sigma2)
}

fn evaluate_normal(mu: f64, sigma: f64, target_line: f64) -> f64 {
    normal_cdf((mu - target_line + 0.5) / sigma)
}

/// Two-pass negative-binomial calibration, returning `(mu, r)`.
///
/// # Errors
/// Propagates a numerics error if bisection is handed non-positive
/// parameters.
fn calibrate_negbin(line_book: f64, p_book: f64, r_over_mu: f64) -> Result<(f64, f64)> {
    let k_book = threshold_k(line_book);
    let mu_guess = f64::from(k_book).max(0.1);
    let r1 = if mu_guess <= 0.0 { 10.0 } else { r_over_mu * mu_guess };
    let mu1 = negbin_infer_mean(k_book, p_book, r1)?;
    let r2 = if mu1 <= 0.0 { 10.0 } else { r_over_mu * mu1 };
    let mu2 = negbin_infer_mean(k_book, p_book, r2)?;
    Ok((mu2, r2))
}

fn evaluate_negbin(mu: f64, r: f64, target_line: f64) -> Result<f64> {
    Ok(negbin_survival(threshold_k(target_line), mu, r)?)
}

/// Projects one book's prop quote onto the exchange's `target_line`,
/// returning the implied over-probability at that line.
///
/// # Errors
/// Propagates a numerics error from vig removal or negative-binomial
/// bisection.
pub fn project_to_target_line(quote: &PlayerPropQuote, target_line: f64) -> Result<f64> {
    let raw_over = american_odds_to_prob(quote.over_odds)?;
    let raw_under = american_odds_to_prob(quote.under_odds)?;
    let (p_over, _p_under) = vig_power(raw_over, raw_under)?;

    if quote.prop_type.is_continuous() {
        let (mu, sigma) = calibrate_normal(quote.line, p_over);
        Ok(evaluate_normal(mu, sigma, target_line))
    } else {
        let (mu, r) = calibrate_negbin(quote.line, p_over, negbin_r_over_mu(quote.prop_type))?;
        evaluate_negbin(mu, r, target_line)
    }
}

/// Pools multiple books' prop quotes (possibly at different lines) into
/// a single over-probability at `target_line`, combining valid
/// projections by arithmetic mean in logit space. Projections outside
/// `(0, 1)` are skipped rather than propagated (§4.4 multi-line
/// pooling).
///
/// # Errors
/// Returns the first numerics error encountered while projecting any
/// quote; returns `Ok` with a degenerate result only if at least one
/// quote projects successfully — callers should treat an empty `quotes`
/// slice as a caller error and check before calling.
pub fn pool_player_prop(quotes: &[PlayerPropQuote], target_line: f64) -> Result<Option<f64>> {
    let mut logits = Vec::with_capacity(quotes.len());

    for quote in quotes {
        let projected = project_to_target_line(quote, target_line)?;
        if projected > 0.0 && projected < 1.0 {
            logits.push(logit(projected));
        }
    }

    if logits.is_empty() {
        return Ok(None);
    }

    let mean_logit: f64 = logits.iter().sum::<f64>() / logits.len() as f64;
    Ok(Some(sigmoid(mean_logit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use algo_trade_core::PlayerIdentity;

    fn prop_quote(book: &str, prop_type: PropType, line: f64, over_odds: i32, under_odds: i32) -> PlayerPropQuote {
        PlayerPropQuote {
            book_name: book.to_string(),
            player: PlayerIdentity { player_id: "p1".to_string(), name: "Player One".to_string() },
            prop_type,
            line,
            over_odds,
            under_odds,
            updated_at: None,
        }
    }

    #[test]
    fn threshold_k_handles_half_integer_and_integer_lines() {
        assert_eq!(threshold_k(9.5), 10);
        assert_eq!(threshold_k(9.0), 10);
        assert_eq!(threshold_k(10.0), 11);
    }

    #[test]
    fn projecting_to_the_books_own_line_recovers_its_probability() {
        let quote = prop_quote("pinnacle", PropType::Points, 24.5, -115, -105);
        let raw_over = american_odds_to_prob(-115).unwrap();
        let raw_under = american_odds_to_prob(-105).unwrap();
        let (expected, _) = vig_power(raw_over, raw_under).unwrap();
        let projected = project_to_target_line(&quote, 24.5).unwrap();
        assert!((projected - expected).abs() < 1e-3, "expected={expected} projected={projected}");
    }

    #[test]
    fn higher_target_line_lowers_over_probability_for_points() {
        let quote = prop_quote("pinnacle", PropType::Points, 24.5, -115, -105);
        let at_book_line = project_to_target_line(&quote, 24.5).unwrap();
        let at_higher_line = project_to_target_line(&quote, 27.5).unwrap();
        assert!(at_higher_line < at_book_line);
    }

    #[test]
    fn count_prop_projects_consistently() {
        let quote = prop_quote("pinnacle", PropType::Rebounds, 9.5, -120, 100);
        let at_book_line = project_to_target_line(&quote, 9.5).unwrap();
        let at_higher_line = project_to_target_line(&quote, 11.5).unwrap();
        assert!(at_higher_line < at_book_line);
    }

    #[test]
    fn multi_line_pooling_combines_in_logit_space() {
        let quotes = vec![
            prop_quote("pinnacle", PropType::Points, 24.5, -115, -105),
            prop_quote("draftkings", PropType::Points, 25.5, -110, -110),
        ];
        let pooled = pool_player_prop(&quotes, 25.0).unwrap().unwrap();
        assert!(pooled > 0.0 && pooled < 1.0);
    }

    #[test]
    fn empty_input_pools_to_none() {
        let pooled = pool_player_prop(&[], 24.5).unwrap();
        assert!(pooled.is_none());
    }
}
