//! Opportunity detection: turns a market's consensus probability into a
//! sized, fee-aware trading candidate (§4.5).
//!
//! The pipeline runs in the order the steps are named below:
//! book-count gate -> shrinkage toward the exchange's own prior ->
//! scaled EV threshold -> raw/adjusted EV -> Kelly sizing. See
//! [`candidate::evaluate`] for the entry point.

pub mod candidate;
pub mod ev;
pub mod kelly;
pub mod shrinkage;
pub mod types;

pub use candidate::evaluate;
pub use ev::{adjusted_ev, raw_ev};
pub use kelly::{kelly_fraction, kelly_to_contracts};
pub use shrinkage::{scaled_ev_threshold, shrink_toward_exchange, shrinkage_weight, FULL_WEIGHT_BOOK_COUNT};
pub use types::{DetectionConfig, OpportunityCandidate};
