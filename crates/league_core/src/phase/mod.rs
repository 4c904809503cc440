//! Season phase machine.
//!
//! [`advance`] checks the target against [`Phase::legal_targets`], runs the
//! target's preconditions, and applies its bulk mutation on a staged copy of
//! the league. Nothing is committed unless every step succeeds. The draft
//! operations used while a draft is open live in [`draft`].

pub mod awards;
pub mod draft;
mod offseason;
mod season;

#[cfg(test)]
mod tests;

pub use awards::award_season;
pub use draft::{auto_pick, available, draft_order, on_the_clock, select_player, until_end, until_user_or_end};

use tracing::info;

use crate::error::{LeagueError, Result};
use crate::events::{EventSet, UpdateEvent};
use crate::models::{EventKind, Phase};
use crate::player::DevelopmentModel;
use crate::state::LeagueState;

/// Checks that leave the league untouched when they fail.
fn preconditions(state: &LeagueState, from: Phase, to: Phase) -> Result<()> {
    match to {
        Phase::RegularSeason => season::check_user_roster(state),
        Phase::Playoffs => season::check_schedule_played(state),
        Phase::BeforeDraft => season::check_playoffs_done(state),
        Phase::Draft => draft::require_draft_classes(state),
        Phase::AfterDraft => draft::require_empty_order(state),
        Phase::Preseason if from == Phase::FantasyDraft => draft::require_empty_order(state),
        _ => Ok(()),
    }
}

/// The phase's bulk mutation. Runs with `ctx.phase` already set to `to`.
fn enter(state: &mut LeagueState, from: Phase, to: Phase, dev: &dyn DevelopmentModel) -> Result<EventSet> {
    let mut events = EventSet::of([UpdateEvent::NewPhase, UpdateEvent::GameAttributes]);
    match to {
        Phase::Preseason if from == Phase::FantasyDraft => {
            draft::leave_fantasy_draft(state)?;
            events.insert(UpdateEvent::PlayerMovement);
        }
        Phase::Preseason => {
            season::enter_new_season(state, dev)?;
            events.extend(EventSet::of([UpdateEvent::PlayerMovement, UpdateEvent::DbChange]));
        }
        Phase::RegularSeason => {
            season::enter_regular_season(state)?;
            events.extend(EventSet::of([UpdateEvent::PlayerMovement, UpdateEvent::DbChange]));
        }
        Phase::AfterTradeDeadline => {}
        Phase::Playoffs => {
            season::enter_playoffs(state)?;
            events.insert(UpdateEvent::DbChange);
        }
        Phase::BeforeDraft => {
            draft::enter_before_draft(state)?;
            events.insert(UpdateEvent::DbChange);
        }
        Phase::Draft => {
            draft::enter_draft(state)?;
            events.insert(UpdateEvent::DbChange);
        }
        Phase::AfterDraft => {
            draft::enter_after_draft(state)?;
            events.insert(UpdateEvent::PlayerMovement);
        }
        Phase::ResignPlayers => {
            offseason::enter_resign_players(state)?;
            events.insert(UpdateEvent::PlayerMovement);
        }
        Phase::FreeAgency => {
            offseason::enter_free_agency(state)?;
            events.insert(UpdateEvent::PlayerMovement);
        }
        Phase::FantasyDraft => {
            draft::enter_fantasy_draft(state)?;
            events.insert(UpdateEvent::PlayerMovement);
        }
    }
    Ok(events)
}

/// Moves the league to `to` atomically and returns the update events the
/// transition produced.
pub fn advance(state: &mut LeagueState, to: Phase, dev: &dyn DevelopmentModel) -> Result<EventSet> {
    let from = state.ctx.phase;
    if !from.can_transition_to(to) {
        return Err(LeagueError::IllegalTransition { from, to });
    }
    let events = state.transaction(|s| {
        preconditions(s, from, to)?;
        if from == Phase::FreeAgency {
            s.ctx.season += 1;
        }
        s.ctx.phase = to;
        let events = enter(s, from, to, dev)?;
        s.sync_game_attributes()?;
        let text = format!("{} {} started", s.ctx.season, to.name());
        s.log_event(EventKind::NewPhase, text, vec![], vec![]);
        s.store.check_integrity()?;
        Ok(events)
    })?;
    info!(%from, %to, season = state.ctx.season, "phase changed");
    Ok(events)
}

/// Advances to the successor of the current phase.
pub fn advance_to_next(state: &mut LeagueState, dev: &dyn DevelopmentModel) -> Result<EventSet> {
    advance(state, state.ctx.phase.successor(), dev)
}
