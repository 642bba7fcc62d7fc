use thiserror::Error;

/// Errors raised by the pure-math layer.
///
/// These never originate from I/O; every variant reflects a caller
/// passing a value outside the domain a formula is defined on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericsError {
    #[error("invalid probability input: {0}")]
    InvalidProbability(f64),

    #[error("invalid vig removal input: a={a}, b={b} (both must be > 0)")]
    InvalidVigInput { a: f64, b: f64 },

    #[error("power vig removal did not converge after {iterations} iterations")]
    VigNotConverged { iterations: u32 },

    #[error("invalid degrees of freedom: {0} (must be >= 1)")]
    InvalidDegreesOfFreedom(f64),

    #[error("bisection did not converge after {iterations} iterations (last residual {residual})")]
    BisectionNotConverged { iterations: u32, residual: f64 },

    #[error("invalid negative binomial parameters: mu={mu}, r={r}")]
    InvalidNegBinParams { mu: f64, r: f64 },
}

pub type Result<T> = std::result::Result<T, NumericsError>;
