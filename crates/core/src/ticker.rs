//! Exchange ticker construction (§6): `SERIES-YYMONDDAWAYHOME[-...]`.
//!
//! Series codes are fixed per market kind. Game-level markets need only
//! the date and team abbreviations; prop markets append a player-specific
//! suffix since a single game can have many simultaneous prop tickers.

use crate::domain::{MarketKind, PropType};
use chrono::{DateTime, Datelike, Utc};

/// The fixed series prefix for a market kind, matching the exchange's own
/// naming convention for this sport's contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerSeries {
    Moneyline,
    Spread,
    Total,
    Prop(PropType),
}

impl TickerSeries {
    #[must_use]
    pub fn from_market_kind(kind: MarketKind) -> Self {
        match kind {
            MarketKind::Moneyline => Self::Moneyline,
            MarketKind::Spread(_) => Self::Spread,
            MarketKind::Total(_) => Self::Total,
            MarketKind::Prop { prop_type, .. } => Self::Prop(prop_type),
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Moneyline => "KXNBA",
            Self::Spread => "KXNBASPREAD",
            Self::Total => "KXNBATOTAL",
            Self::Prop(PropType::Points) => "KXNBAPTS",
            Self::Prop(PropType::Rebounds) => "KXNBAREB",
            Self::Prop(PropType::Assists) => "KXNBAAST",
            Self::Prop(PropType::Threes) => "KXNBA3PM",
            Self::Prop(PropType::Steals) => "KXNBASTL",
            Self::Prop(PropType::Blocks) => "KXNBABLK",
        }
    }
}

fn month_code(month: u32) -> &'static str {
    const MONTHS: [&str; 12] =
        ["JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC"];
    MONTHS[(month.clamp(1, 12) - 1) as usize]
}

/// Builds the date component shared by every ticker: two-digit year,
/// uppercase three-letter month, two-digit day.
#[must_use]
pub fn date_component(start_time: DateTime<Utc>) -> String {
    format!("{:02}{}{:02}", start_time.year() % 100, month_code(start_time.month()), start_time.day())
}

/// Builds a game-level ticker: `SERIES-YYMONDDAWAYHOME`.
#[must_use]
pub fn build_ticker(
    kind: MarketKind,
    start_time: DateTime<Utc>,
    away_team: &str,
    home_team: &str,
) -> String {
    let series = TickerSeries::from_market_kind(kind);
    format!(
        "{}-{}{}{}",
        series.code(),
        date_component(start_time),
        away_team.to_uppercase(),
        home_team.to_uppercase()
    )
}

/// Builds a player-prop ticker: `SERIES-YYMONDDAWAYHOME-PLAYERID`.
#[must_use]
pub fn build_prop_ticker(
    prop_type: PropType,
    start_time: DateTime<Utc>,
    away_team: &str,
    home_team: &str,
    player_id: &str,
) -> String {
    let game_ticker =
        build_ticker(MarketKind::Prop { prop_type, line: 0.0 }, start_time, away_team, home_team);
    format!("{game_ticker}-{}", player_id.to_uppercase())
}
