//! Market taxonomy shared across consensus, detection, and execution.
//!
//! Moneyline, spread, total, and player-prop markets share a common
//! expected-value/Kelly core but differ in how a consensus is built and
//! how a ticker is derived. [`MarketKind`] is the tagged variant that
//! lets the rest of the engine dispatch on that difference without a
//! trait object per market type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The side of a two-sided market a candidate or position is on, in the
/// semantic sense used by the odds aggregator (not the exchange's
/// yes/no contract side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticSide {
    Home,
    Away,
    Over,
    Under,
}

impl SemanticSide {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
            Self::Over => Self::Under,
            Self::Under => Self::Over,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
            Self::Over => "over",
            Self::Under => "under",
        }
    }
}

impl fmt::Display for SemanticSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Player-prop statistic types the engine recognizes, each carrying its
/// own distribution family and default dispersion (see
/// `algo_trade_consensus::interpolation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropType {
    Points,
    Rebounds,
    Assists,
    Threes,
    Steals,
    Blocks,
}

impl PropType {
    /// Whether this prop is modeled as a continuous quantity (points) or
    /// a count (everything else).
    #[must_use]
    pub fn is_continuous(self) -> bool {
        matches!(self, Self::Points)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Rebounds => "rebounds",
            Self::Assists => "assists",
            Self::Threes => "threes",
            Self::Steals => "steals",
            Self::Blocks => "blocks",
        }
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tagged variant over the market shapes the engine trades.
///
/// `Spread` and `Total` carry the exchange's own target line, since
/// cross-line normalization needs it to interpret each book's quote.
/// `Prop` carries both the statistic and the exchange's target
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarketKind {
    Moneyline,
    Spread(f64),
    Total(f64),
    Prop { prop_type: PropType, line: f64 },
}

impl MarketKind {
    /// Student-t degrees of freedom used for cross-line normalization.
    /// Only meaningful for `Spread`/`Total`.
    #[must_use]
    pub fn line_normalization_df(self) -> Option<f64> {
        match self {
            Self::Spread(_) => Some(7.0),
            Self::Total(_) => Some(9.0),
            Self::Moneyline | Self::Prop { .. } => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Moneyline => "moneyline",
            Self::Spread(_) => "spread",
            Self::Total(_) => "total",
            Self::Prop { .. } => "prop",
        }
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moneyline => write!(f, "moneyline"),
            Self::Spread(line) => write!(f, "spread({line})"),
            Self::Total(line) => write!(f, "total({line})"),
            Self::Prop { prop_type, line } => write!(f, "prop({prop_type}@{line})"),
        }
    }
}

/// One bookmaker's quote for a game-level or player-prop market (§3,
/// §4.3 step 1). `market_kind`'s embedded line (for `Spread`/`Total`/
/// `Prop`) is *this book's own quoted line*, which may differ from the
/// exchange's target line the consensus pipeline normalizes against —
/// the two are never the same value by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookQuote {
    pub book_name: String,
    pub market_kind: MarketKind,
    /// American odds for the "home"/"over" side.
    pub side_a_odds: i32,
    /// American odds for the "away"/"under" side.
    pub side_b_odds: i32,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One bookmaker's quote for a player-prop "over L" line (§3, §4.4).
/// Parallel to [`BookQuote`] but keyed to a player rather than a
/// game-level market, since a single game carries many simultaneous
/// prop lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPropQuote {
    pub book_name: String,
    pub player: PlayerIdentity,
    pub prop_type: PropType,
    pub line: f64,
    pub over_odds: i32,
    pub under_odds: i32,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Identity of the scheduled event a market belongs to, as reported by
/// the odds aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameIdentity {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

/// Identity of a player a prop market is written against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub player_id: String,
    pub name: String,
}

/// Aggregate counts for one completed scan tick, the payload of the
/// scan-summary alert (§4.9 step 9).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub games_scanned: u32,
    pub candidates_found: u32,
    pub orders_submitted: u32,
    pub bankroll_before_cents: i64,
    pub bankroll_after_cents: i64,
}

impl ScanSummary {
    #[must_use]
    pub fn new(bankroll_before_cents: i64) -> Self {
        Self {
            games_scanned: 0,
            candidates_found: 0,
            orders_submitted: 0,
            bankroll_before_cents,
            bankroll_after_cents: bankroll_before_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_side_opposite_is_involutive() {
        for side in [SemanticSide::Home, SemanticSide::Away, SemanticSide::Over, SemanticSide::Under] {
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn line_normalization_df_matches_spec() {
        assert_eq!(MarketKind::Spread(-3.5).line_normalization_df(), Some(7.0));
        assert_eq!(MarketKind::Total(220.0).line_normalization_df(), Some(9.0));
        assert_eq!(MarketKind::Moneyline.line_normalization_df(), None);
    }

    #[test]
    fn prop_type_continuous_classification() {
        assert!(PropType::Points.is_continuous());
        assert!(!PropType::Rebounds.is_continuous());
    }

    #[test]
    fn book_quote_carries_its_own_line_independent_of_a_target() {
        let quote = BookQuote {
            book_name: "pinnacle".to_string(),
            market_kind: MarketKind::Spread(-3.0),
            side_a_odds: -110,
            side_b_odds: -110,
            updated_at: None,
        };
        assert_eq!(quote.market_kind, MarketKind::Spread(-3.0));
    }
}
