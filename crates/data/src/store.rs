//! Sqlite-backed implementation of [`algo_trade_core::position::PositionStore`].

use algo_trade_core::domain::{MarketKind, SemanticSide};
use algo_trade_core::position::{Leg, NewPosition, Position, PositionStore, PositionStoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

/// Opens (creating if necessary) the sqlite database at `path` and runs
/// the embedded schema migration.
pub struct SqlitePositionStore {
    pool: SqlitePool,
}

impl SqlitePositionStore {
    /// Connects to the sqlite file at `path`, creating the file and the
    /// `positions` table if they don't already exist.
    ///
    /// # Errors
    /// Returns an error if the database file cannot be opened or the
    /// schema migration fails.
    pub async fn connect(path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{path}"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Connects to an in-memory sqlite database. Intended for tests.
    ///
    /// # Errors
    /// Returns an error if the schema migration fails.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS positions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game_id TEXT NOT NULL,
                market_kind TEXT NOT NULL,
                semantic_side TEXT NOT NULL,
                ticker TEXT NOT NULL,
                leg TEXT NOT NULL,
                entry_price REAL NOT NULL,
                contracts INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(ticker, leg)
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn row_to_position(row: &sqlx::sqlite::SqliteRow) -> Result<Position, PositionStoreError> {
    let market_kind: String = row.try_get("market_kind").map_err(backend_err)?;
    let semantic_side: String = row.try_get("semantic_side").map_err(backend_err)?;
    let leg: String = row.try_get("leg").map_err(backend_err)?;
    let created_at: String = row.try_get("created_at").map_err(backend_err)?;

    Ok(Position {
        id: row.try_get("id").map_err(backend_err)?,
        game_id: row.try_get("game_id").map_err(backend_err)?,
        market_kind: serde_json::from_str::<MarketKind>(&market_kind).map_err(backend_err)?,
        semantic_side: serde_json::from_str::<SemanticSide>(&semantic_side).map_err(backend_err)?,
        ticker: row.try_get("ticker").map_err(backend_err)?,
        leg: parse_leg(&leg)?,
        entry_price: row.try_get("entry_price").map_err(backend_err)?,
        contracts: {
            let contracts: i64 = row.try_get("contracts").map_err(backend_err)?;
            contracts as u32
        },
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(backend_err)?
            .with_timezone(&Utc),
    })
}

fn parse_leg(s: &str) -> Result<Leg, PositionStoreError> {
    match s {
        "yes" => Ok(Leg::Yes),
        "no" => Ok(Leg::No),
        other => Err(PositionStoreError::Backend(format!("unknown leg: {other}"))),
    }
}

fn backend_err(e: impl std::fmt::Display) -> PositionStoreError {
    PositionStoreError::Backend(e.to_string())
}

#[async_trait]
impl PositionStore for SqlitePositionStore {
    async fn insert(&self, position: NewPosition) -> Result<Position, PositionStoreError> {
        let market_kind = serde_json::to_string(&position.market_kind).map_err(backend_err)?;
        let semantic_side = serde_json::to_string(&position.semantic_side).map_err(backend_err)?;
        let created_at = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO positions
                (game_id, market_kind, semantic_side, ticker, leg, entry_price, contracts, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&position.game_id)
        .bind(&market_kind)
        .bind(&semantic_side)
        .bind(&position.ticker)
        .bind(position.leg.as_str())
        .bind(position.entry_price)
        .bind(i64::from(position.contracts))
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        let id = match result {
            Ok(res) => res.last_insert_rowid(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(PositionStoreError::Duplicate {
                    ticker: position.ticker,
                    leg: position.leg.as_str(),
                });
            }
            Err(e) => return Err(backend_err(e)),
        };

        Ok(Position {
            id,
            game_id: position.game_id,
            market_kind: position.market_kind,
            semantic_side: position.semantic_side,
            ticker: position.ticker,
            leg: position.leg,
            entry_price: position.entry_price,
            contracts: position.contracts,
            created_at,
        })
    }

    async fn find(&self, ticker: &str, leg: Leg) -> Result<Option<Position>, PositionStoreError> {
        let row = sqlx::query("SELECT * FROM positions WHERE ticker = ? AND leg = ?")
            .bind(ticker)
            .bind(leg.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend_err)?;

        row.as_ref().map(row_to_position).transpose()
    }

    async fn all_open(&self) -> Result<Vec<Position>, PositionStoreError> {
        let rows = sqlx::query("SELECT * FROM positions ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(backend_err)?;

        rows.iter().map(row_to_position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algo_trade_core::domain::{MarketKind, SemanticSide};

    fn new_position(ticker: &str, leg: Leg) -> NewPosition {
        NewPosition {
            game_id: "game-1".to_string(),
            market_kind: MarketKind::Moneyline,
            semantic_side: SemanticSide::Home,
            ticker: ticker.to_string(),
            leg,
            entry_price: 0.55,
            contracts: 10,
        }
    }

    #[tokio::test]
    async fn insert_then_find_round_trips() {
        let store = SqlitePositionStore::in_memory().await.unwrap();
        let inserted = store.insert(new_position("T1", Leg::Yes)).await.unwrap();
        assert_eq!(inserted.ticker, "T1");

        let found = store.find("T1", Leg::Yes).await.unwrap().unwrap();
        assert_eq!(found.ticker, "T1");
        assert_eq!(found.leg, Leg::Yes);
        assert_eq!(found.market_kind, MarketKind::Moneyline);
    }

    #[tokio::test]
    async fn duplicate_ticker_and_leg_is_rejected() {
        let store = SqlitePositionStore::in_memory().await.unwrap();
        store.insert(new_position("T1", Leg::Yes)).await.unwrap();
        let err = store.insert(new_position("T1", Leg::Yes)).await.unwrap_err();
        assert!(matches!(err, PositionStoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn opposite_leg_is_not_a_duplicate() {
        let store = SqlitePositionStore::in_memory().await.unwrap();
        store.insert(new_position("T1", Leg::Yes)).await.unwrap();
        assert!(store.insert(new_position("T1", Leg::No)).await.is_ok());
    }

    #[tokio::test]
    async fn all_open_lists_every_position_oldest_first() {
        let store = SqlitePositionStore::in_memory().await.unwrap();
        store.insert(new_position("T1", Leg::Yes)).await.unwrap();
        store.insert(new_position("T2", Leg::No)).await.unwrap();
        let all = store.all_open().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].ticker, "T1");
        assert_eq!(all[1].ticker, "T2");
    }

    #[tokio::test]
    async fn find_missing_position_returns_none() {
        let store = SqlitePositionStore::in_memory().await.unwrap();
        assert!(store.find("NOPE", Leg::Yes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn connect_creates_parent_directory_and_persists_across_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("positions.sqlite3");
        let path_str = path.to_str().unwrap();

        {
            let store = SqlitePositionStore::connect(path_str).await.unwrap();
            store.insert(new_position("T1", Leg::Yes)).await.unwrap();
        }

        let store = SqlitePositionStore::connect(path_str).await.unwrap();
        assert!(store.find("T1", Leg::Yes).await.unwrap().is_some());
    }
}
