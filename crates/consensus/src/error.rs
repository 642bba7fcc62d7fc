//! Error type for the consensus pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    /// No book quote survived freshness/family filtering (§4.3 step 4).
    #[error("no valid book quotes available for this market")]
    NoValidBooks,

    /// A numerics primitive rejected its input (bad vig pair, degenerate
    /// degrees of freedom, non-positive negative-binomial parameters).
    #[error("numerics error: {0}")]
    Numerics(#[from] algo_trade_numerics::NumericsError),

    /// Cross-line normalization was attempted on a market kind that
    /// doesn't carry a line (moneyline, prop).
    #[error("market kind {0} has no line to normalize")]
    NotLineBased(String),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
