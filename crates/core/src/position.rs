//! The persisted `Position` entity and its storage trait (§3, §5).
//!
//! The store itself lives outside this crate (see the workspace's `data`
//! crate for the sqlite-backed implementation); this module only defines
//! the entity and the trait surface the execution controller and scan
//! loop need, so neither depends on a concrete storage engine.

use crate::domain::{MarketKind, SemanticSide};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A held position, unique by `(ticker, leg)` for duplicate detection
/// (§4.8 step 2, §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: i64,
    pub game_id: String,
    pub market_kind: MarketKind,
    pub semantic_side: SemanticSide,
    pub ticker: String,
    pub leg: Leg,
    pub entry_price: f64,
    pub contracts: u32,
    pub created_at: DateTime<Utc>,
}

/// Which exchange contract (yes/no) a position holds. Distinct from
/// [`SemanticSide`], which is the odds-aggregator's home/away/over/under
/// vocabulary — the two are related by the candidate's market mapping,
/// not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    Yes,
    No,
}

impl Leg {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// A new position to persist, before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPosition {
    pub game_id: String,
    pub market_kind: MarketKind,
    pub semantic_side: SemanticSide,
    pub ticker: String,
    pub leg: Leg,
    pub entry_price: f64,
    pub contracts: u32,
}

#[derive(Debug, Error)]
pub enum PositionStoreError {
    #[error("position already exists for ticker {ticker} leg {leg}")]
    Duplicate { ticker: String, leg: &'static str },
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Append-mostly storage for positions, read for duplicate and hedge
/// checks (§5). Implementations must enforce single-writer or
/// transactional semantics per `(ticker, leg)` uniqueness.
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Persists a new position. Errors with
    /// [`PositionStoreError::Duplicate`] if `(ticker, leg)` already
    /// exists, rather than silently overwriting it.
    async fn insert(&self, position: NewPosition) -> Result<Position, PositionStoreError>;

    /// Returns the position for `(ticker, leg)`, if any — the local
    /// duplicate check of §4.8 step 2.
    async fn find(&self, ticker: &str, leg: Leg) -> Result<Option<Position>, PositionStoreError>;

    /// Returns every currently-open position, for the per-scan hedge
    /// sweep (§4.9 step 8).
    async fn all_open(&self) -> Result<Vec<Position>, PositionStoreError>;
}
