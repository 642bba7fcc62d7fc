//! Sqlite-backed position storage for the trading engine.
//!
//! This crate provides the only concrete implementation of
//! `algo_trade_core::position::PositionStore` the scan loop runs
//! against in production — an embedded sqlite database keyed by the
//! `(ticker, leg)` uniqueness the duplicate check relies on.

pub mod store;

pub use store::SqlitePositionStore;
