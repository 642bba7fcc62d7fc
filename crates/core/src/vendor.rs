//! Per-book prior weight table for the log-linear pool (§4.3 step 3, §6).
//!
//! The spec treats this table as "an input to this spec, not part of it" —
//! a static example is supplied here, but a deployment can layer a config
//! override on top via [`vendor_weight_with_overrides`].

use std::collections::HashMap;

/// Coarse tiers of bookmaker reliability; each carries a default prior
/// multiplier used as the weight in §4.3 step 3's weighted logit average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorTier {
    /// Sharp, low-margin books whose lines move the market.
    Sharp,
    /// Large mainstream retail books.
    Mainstream,
    /// Smaller recreational books, noisier lines.
    Recreational,
}

impl VendorTier {
    #[must_use]
    pub fn default_weight(self) -> f64 {
        match self {
            Self::Sharp => 1.5,
            Self::Mainstream => 1.0,
            Self::Recreational => 0.7,
        }
    }
}

fn static_table() -> &'static HashMap<&'static str, VendorTier> {
    use std::sync::OnceLock;
    static TABLE: OnceLock<HashMap<&'static str, VendorTier>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        table.insert("pinnacle", VendorTier::Sharp);
        table.insert("circa", VendorTier::Sharp);
        table.insert("bookmaker", VendorTier::Sharp);
        table.insert("draftkings", VendorTier::Mainstream);
        table.insert("fanduel", VendorTier::Mainstream);
        table.insert("betmgm", VendorTier::Mainstream);
        table.insert("caesars", VendorTier::Mainstream);
        table.insert("pointsbet", VendorTier::Mainstream);
        table.insert("betrivers", VendorTier::Recreational);
        table.insert("unibet", VendorTier::Recreational);
        table.insert("wynnbet", VendorTier::Recreational);
        table
    })
}

/// Looks up `name`'s prior weight, case-insensitively. Unknown books
/// default to [`VendorTier::Mainstream`]'s weight, a neutral middle
/// ground rather than penalizing or over-trusting an unrecognized feed.
#[must_use]
pub fn vendor_weight(name: &str) -> f64 {
    let key = name.to_lowercase();
    static_table().get(key.as_str()).copied().unwrap_or(VendorTier::Mainstream).default_weight()
}

/// As [`vendor_weight`], but consulting a caller-supplied override map
/// first (e.g. loaded from config), falling back to the static table.
#[must_use]
pub fn vendor_weight_with_overrides(name: &str, overrides: &HashMap<String, f64>) -> f64 {
    let key = name.to_lowercase();
    overrides.get(&key).copied().unwrap_or_else(|| vendor_weight(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sharp_book_gets_sharp_weight() {
        assert_eq!(vendor_weight("Pinnacle"), VendorTier::Sharp.default_weight());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(vendor_weight("DRAFTKINGS"), vendor_weight("draftkings"));
    }

    #[test]
    fn unknown_book_defaults_to_mainstream() {
        assert_eq!(vendor_weight("some_random_book"), VendorTier::Mainstream.default_weight());
    }

    #[test]
    fn override_takes_precedence() {
        let mut overrides = HashMap::new();
        overrides.insert("draftkings".to_string(), 2.0);
        assert_eq!(vendor_weight_with_overrides("draftkings", &overrides), 2.0);
    }

    #[test]
    fn override_miss_falls_back_to_static_table() {
        let overrides = HashMap::new();
        assert_eq!(vendor_weight_with_overrides("pinnacle", &overrides), VendorTier::Sharp.default_weight());
    }
}
