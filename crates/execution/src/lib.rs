//! Execution controller for prediction-market opportunities (§4.8).
//!
//! Given an accepted [`algo_trade_detection::OpportunityCandidate`] this
//! crate resolves its real-world sizing and fill price against the
//! current book, persists a position before the exchange ever sees an
//! order, and submits a limit-IOC order so a thin fill never leaves a
//! resting order behind. The same controller also executes the hedge
//! and pure-arbitrage paths the scan loop's per-position sweep finds.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod types;

pub use controller::ExecutionController;
pub use error::ExecutionError;
pub use gateway::{ExchangeGateway, GatewayResult};
pub use types::{ArbExecutionResult, CandidateOutcome, ExecutionConfig, ExecutionResult};
