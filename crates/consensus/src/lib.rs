//! Multi-book odds fusion (§4.3, §4.4).
//!
//! Turns the raw quotes `algo_trade_odds_client` fetches into a single
//! fused probability per game+market: vig removal and cross-line
//! normalization for game-level markets, two-pass distribution
//! calibration for player props, both converging on the same log-linear
//! pooling step. Pure computation — no I/O, no persistence.

mod error;
mod game_consensus;
mod interpolation;
mod line_normalization;
mod pooling;
mod prop_consensus;
mod types;

pub use error::{ConsensusError, Result};
pub use game_consensus::build_game_consensus;
pub use interpolation::{pool_player_prop, project_to_target_line};
pub use line_normalization::normalize_cross_line;
pub use pooling::pool_probabilities;
pub use prop_consensus::build_prop_consensus;
pub use types::Consensus;
