//! Scan-global games-slate cache (§4.9 step 1, §5).
//!
//! Process-lifetime, keyed by game id, invalidated after a configurable
//! TTL (default 5 minutes) or when the wall-clock date rolls over. Not a
//! singleton promoted from per-scan state — it's explicitly initialized
//! once by the process entry point and handed to the scan loop.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Team status strings recognized as "this game is no longer biddable"
/// (§6): exact "Final", or any status containing "Qtr", "Halftime", "OT".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    #[must_use]
    pub fn from_raw(status: &str) -> Self {
        if status.eq_ignore_ascii_case("final")
            || status.contains("Qtr")
            || status.contains("Halftime")
            || status.contains("OT")
        {
            Self::Final
        } else if status.eq_ignore_ascii_case("scheduled") {
            Self::Scheduled
        } else {
            Self::InProgress
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub game_id: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub status: GameStatus,
    pub home_team: String,
    pub away_team: String,
}

impl Game {
    /// Whether this game is still worth scanning: not yet final, and its
    /// start time is at least `min_lead` away (§4.9 step 5).
    #[must_use]
    pub fn is_scannable(&self, now: DateTime<Utc>, min_lead: chrono::Duration) -> bool {
        self.status != GameStatus::Final && self.start_time - now >= min_lead
    }
}

struct CacheEntry {
    games: Vec<Game>,
    fetched_at: DateTime<Utc>,
    date: NaiveDate,
}

pub struct GamesCache {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl GamesCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: Mutex::new(None) }
    }

    /// Returns the cached slate for `date` if it's still fresh, else
    /// `None` to signal the caller should re-fetch and call [`Self::put`].
    #[must_use]
    pub fn get(&self, date: NaiveDate, now: DateTime<Utc>) -> Option<Vec<Game>> {
        let entry = self.entry.lock();
        match entry.as_ref() {
            Some(e) if e.date == date && (now - e.fetched_at).to_std().unwrap_or_default() < self.ttl => {
                Some(e.games.clone())
            }
            _ => None,
        }
    }

    pub fn put(&self, date: NaiveDate, games: Vec<Game>, now: DateTime<Utc>) {
        *self.entry.lock() = Some(CacheEntry { games, fetched_at: now, date });
    }
}
