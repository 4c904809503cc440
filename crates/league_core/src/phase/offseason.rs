use tracing::info;

use crate::context::RngStream;
use crate::error::Result;
use crate::market::{ai_resign, auto_sign, cancel_negotiation, open_resign_negotiations, refresh_asks};
use crate::models::Negotiation;
use crate::state::LeagueState;

pub(super) fn enter_resign_players(state: &mut LeagueState) -> Result<()> {
    let opened = open_resign_negotiations(state);
    let mut rng = state.ctx.rng(RngStream::FreeAgency);
    ai_resign(state, &mut rng)?;
    info!(negotiations = opened, "re-signing period open");
    Ok(())
}

/// Unfinished negotiations end; the players hit the market with asks based
/// on the user's team, then AI teams sign.
pub(super) fn enter_free_agency(state: &mut LeagueState) -> Result<()> {
    let open: Vec<u32> = state.store.get_all::<Negotiation>().map(|n| n.pid).collect();
    for pid in open {
        cancel_negotiation(state, pid)?;
    }
    let mut rng = state.ctx.rng(RngStream::FreeAgency);
    refresh_asks(state, &mut rng)?;
    let signed = auto_sign(state, &mut rng)?;
    info!(signed, free_agents = state.free_agents().len(), "free agency open");
    Ok(())
}
