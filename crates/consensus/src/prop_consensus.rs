//! Builds a [`Consensus`] for a player-prop market from pooled
//! distribution projections (§4.4).

use crate::error::{ConsensusError, Result};
use crate::interpolation::pool_player_prop;
use crate::types::Consensus;
use algo_trade_core::{MarketKind, PlayerIdentity, PlayerPropQuote, PropType};

/// # Errors
/// Returns [`ConsensusError::NoValidBooks`] if no quote projects to a
/// valid probability at `target_line`, or propagates a numerics error.
pub fn build_prop_consensus(
    quotes: &[PlayerPropQuote],
    player: PlayerIdentity,
    prop_type: PropType,
    target_line: f64,
    exchange_raw_prob_a: f64,
) -> Result<Consensus> {
    let relevant: Vec<PlayerPropQuote> =
        quotes.iter().filter(|q| q.player.player_id == player.player_id && q.prop_type == prop_type).cloned().collect();

    let book_count = relevant.len() as u32;
    let pooled = pool_player_prop(&relevant, target_line)?.ok_or(ConsensusError::NoValidBooks)?;

    Ok(Consensus::new(
        MarketKind::Prop { prop_type, line: target_line },
        Some(player),
        pooled,
        book_count,
        exchange_raw_prob_a,
    ))
}
