//! Exchange taker fee model.
//!
//! `fee(price) = min(0.0175, 0.07 * price * (1 - price))`, where `price`
//! is a traded price expressed as a fraction of $1. Used by EV adjustment,
//! Kelly sizing, and both arbitrage detectors below.

use serde::{Deserialize, Serialize};

const FEE_CAP: f64 = 0.0175;
const FEE_COEFFICIENT: f64 = 0.07;

/// Configuration for the taker fee formula. The cap and coefficient are
/// fixed by the exchange's published schedule but kept configurable so a
/// demo/alternate fee schedule can be swapped in without code changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeeConfig {
    pub cap: f64,
    pub coefficient: f64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self { cap: FEE_CAP, coefficient: FEE_COEFFICIENT }
    }
}

/// Computes the taker fee for a trade at `price` (fraction of $1).
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeCalculator {
    config: FeeConfig,
}

impl FeeCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: FeeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> FeeConfig {
        self.config
    }

    /// Fee as a fraction of $1, for a single contract traded at `price`.
    /// Returns 0 for `price` outside `(0, 1)`.
    #[must_use]
    pub fn fee(&self, price: f64) -> f64 {
        if price <= 0.0 || price >= 1.0 {
            return 0.0;
        }
        (self.config.coefficient * price * (1.0 - price)).min(self.config.cap)
    }

    /// Fee in integer cents for `contracts` traded at `price_cents`.
    #[must_use]
    pub fn fee_cents(&self, price_cents: u32, contracts: u32) -> f64 {
        let price = f64::from(price_cents) / 100.0;
        self.fee(price) * 100.0 * f64::from(contracts)
    }
}

/// Free function mirroring [`FeeCalculator::fee`] with the default
/// configuration, for call sites that don't need to customize it.
#[must_use]
pub fn fee(price: f64) -> f64 {
    FeeCalculator::new().fee(price)
}
