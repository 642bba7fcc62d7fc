//! Wire shapes returned by the odds aggregator, and their conversion into
//! the domain types the rest of the engine consumes (§6).

use algo_trade_core::{BookQuote, Game, GameStatus, MarketKind, PlayerIdentity, PlayerPropQuote, PropType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawGame {
    pub game_id: String,
    pub date: String,
    pub datetime: String,
    pub status: String,
    pub home_team: String,
    pub away_team: String,
}

impl RawGame {
    pub(crate) fn into_domain(self) -> Option<Game> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()?;
        let start_time = DateTime::parse_from_rfc3339(&self.datetime).ok()?.with_timezone(&Utc);
        Some(Game {
            game_id: self.game_id,
            date,
            start_time,
            status: GameStatus::from_raw(&self.status),
            home_team: self.home_team,
            away_team: self.away_team,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawGamesResponse {
    pub games: Vec<RawGame>,
}

/// One book's raw moneyline/spread/total line for a game, as returned by
/// the `/odds` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawGameOdds {
    pub book_name: String,
    pub moneyline_home: Option<i32>,
    pub moneyline_away: Option<i32>,
    pub spread_line: Option<f64>,
    pub spread_home_odds: Option<i32>,
    pub spread_away_odds: Option<i32>,
    pub total_line: Option<f64>,
    pub total_over_odds: Option<i32>,
    pub total_under_odds: Option<i32>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawGameOddsResponse {
    pub books: Vec<RawGameOdds>,
}

impl RawGameOdds {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(|s| DateTime::parse_from_rfc3339(s).ok()).map(|d| d.with_timezone(&Utc))
    }

    /// Splits one book's row into up to three [`BookQuote`]s — moneyline,
    /// spread, total — whichever fields are present. A book need not
    /// quote every market.
    pub(crate) fn into_quotes(self) -> Vec<BookQuote> {
        let mut quotes = Vec::with_capacity(3);
        let updated_at = self.timestamp();

        if let (Some(home), Some(away)) = (self.moneyline_home, self.moneyline_away) {
            quotes.push(BookQuote {
                book_name: self.book_name.clone(),
                market_kind: MarketKind::Moneyline,
                side_a_odds: home,
                side_b_odds: away,
                updated_at,
            });
        }
        if let (Some(line), Some(home), Some(away)) =
            (self.spread_line, self.spread_home_odds, self.spread_away_odds)
        {
            quotes.push(BookQuote {
                book_name: self.book_name.clone(),
                market_kind: MarketKind::Spread(line),
                side_a_odds: home,
                side_b_odds: away,
                updated_at,
            });
        }
        if let (Some(line), Some(over), Some(under)) =
            (self.total_line, self.total_over_odds, self.total_under_odds)
        {
            quotes.push(BookQuote {
                book_name: self.book_name,
                market_kind: MarketKind::Total(line),
                side_a_odds: over,
                side_b_odds: under,
                updated_at,
            });
        }

        quotes
    }
}

/// One book's raw player-prop line, as returned by the `/props` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPropOdds {
    pub book_name: String,
    pub player_id: String,
    pub player_name: String,
    pub prop_type: String,
    pub line: f64,
    pub over_odds: i32,
    pub under_odds: i32,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPropOddsResponse {
    pub props: Vec<RawPropOdds>,
}

fn parse_prop_type(raw: &str) -> Option<PropType> {
    match raw.to_lowercase().as_str() {
        "points" | "pts" => Some(PropType::Points),
        "rebounds" | "reb" => Some(PropType::Rebounds),
        "assists" | "ast" => Some(PropType::Assists),
        "threes" | "3pm" | "three_pointers" => Some(PropType::Threes),
        "steals" | "stl" => Some(PropType::Steals),
        "blocks" | "blk" => Some(PropType::Blocks),
        _ => None,
    }
}

impl RawPropOdds {
    /// Converts to the domain type, dropping rows with an unrecognized
    /// prop-type string (§7 validation/bad-input: silently dropped at the
    /// offending record).
    pub(crate) fn into_domain(self) -> Option<PlayerPropQuote> {
        let prop_type = parse_prop_type(&self.prop_type)?;
        let updated_at =
            self.updated_at.as_deref().and_then(|s| DateTime::parse_from_rfc3339(s).ok()).map(|d| d.with_timezone(&Utc));

        Some(PlayerPropQuote {
            book_name: self.book_name,
            player: PlayerIdentity { player_id: self.player_id, name: self.player_name },
            prop_type,
            line: self.line,
            over_odds: self.over_odds,
            under_odds: self.under_odds,
            updated_at,
        })
    }
}
