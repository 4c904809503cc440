//! The draft: order, selections, class rotation and the fantasy draft.

use rand::seq::SliceRandom;
use tracing::{debug, info};

use super::awards;
use crate::context::RngStream;
use crate::error::{LeagueError, Result};
use crate::market::{make_free_agent, rank_prospects};
use crate::models::{DraftInfo, DraftPick, DraftSlot, EventKind, Owner, Phase, Player};
use crate::player::{gen_draft_class, rookie_contract};
use crate::sim::standings;
use crate::state::LeagueState;

/// Remaining slots, first pick first.
pub fn draft_order(state: &LeagueState) -> Vec<&DraftSlot> {
    // Keyed by overall pick number, so table order is draft order.
    state.store.get_all::<DraftSlot>().collect()
}

pub fn on_the_clock(state: &LeagueState) -> Option<DraftSlot> {
    state.store.get_all::<DraftSlot>().next().cloned()
}

/// Players still available in the draft being held.
fn pool_owner(phase: Phase) -> Result<Owner> {
    match phase {
        Phase::Draft => Ok(Owner::Undrafted(1)),
        Phase::FantasyDraft => Ok(Owner::FantasyDraftTemp),
        other => Err(LeagueError::Draft(format!("no draft is held during the {}", other.name()))),
    }
}

/// Available players, best prospect first.
pub fn available(state: &LeagueState) -> Result<Vec<&Player>> {
    let pool = pool_owner(state.ctx.phase)?;
    Ok(rank_prospects(state.store.players_with_owner(pool)))
}

fn draft_player(state: &mut LeagueState, slot: &DraftSlot, pid: u32) -> Result<()> {
    let pool = pool_owner(state.ctx.phase)?;
    let season = state.ctx.season;
    let p = state
        .store
        .get::<Player>(&pid)
        .ok_or_else(|| LeagueError::NotFound(format!("player {}", pid)))?;
    if p.tid != pool {
        return Err(LeagueError::Draft(format!("{} is not available", p.name)));
    }
    let rookie = (state.ctx.phase == Phase::Draft).then(|| rookie_contract(slot.slot as usize, &state.ctx.settings, season));
    let text = format!("{} selected {} with pick {} of round {}", state.team_abbrev(Owner::Team(slot.tid)), p.name, slot.pick, slot.round);

    state.store.update::<Player>(&pid, |p| {
        p.tid = Owner::Team(slot.tid);
        p.last_tid = Some(slot.tid);
        p.draft = DraftInfo {
            year: season,
            round: slot.round,
            pick: slot.pick,
            tid: Some(slot.tid),
            original_tid: Some(slot.original_tid),
        };
        if let Some(contract) = rookie {
            p.contract = contract;
        }
        p.contract_desired = None;
    });
    state.store.delete::<DraftSlot>(&slot.slot);
    if let Some(dpid) = slot.dpid {
        state.store.delete::<DraftPick>(&dpid);
    }
    info!(pid, tid = slot.tid, slot = slot.slot, "{}", text);
    state.log_event(EventKind::Draft, text, vec![pid], vec![slot.tid]);
    Ok(())
}

/// The user's pick. Fails unless the user's team is on the clock.
pub fn select_player(state: &mut LeagueState, pid: u32) -> Result<()> {
    let slot = on_the_clock(state).ok_or_else(|| LeagueError::Draft("the draft is over".into()))?;
    if !state.ctx.is_user_team(slot.tid) {
        return Err(LeagueError::Draft(format!("{} is on the clock", state.team_abbrev(Owner::Team(slot.tid)))));
    }
    draft_player(state, &slot, pid)
}

/// Lets the team on the clock take the best available player. Returns the
/// pick, or `None` when the order is empty. A slot with nobody left to take
/// is forfeited.
pub fn auto_pick(state: &mut LeagueState) -> Result<Option<u32>> {
    let Some(slot) = on_the_clock(state) else {
        return Ok(None);
    };
    let best = available(state)?.first().map(|p| p.pid);
    match best {
        Some(pid) => {
            draft_player(state, &slot, pid)?;
            Ok(Some(pid))
        }
        None => {
            debug!(slot = slot.slot, "no players left, slot forfeited");
            state.store.delete::<DraftSlot>(&slot.slot);
            Ok(None)
        }
    }
}

/// Auto-picks until the user's team is on the clock or the draft ends.
pub fn until_user_or_end(state: &mut LeagueState) -> Result<Vec<u32>> {
    let mut picked = Vec::new();
    while let Some(slot) = on_the_clock(state) {
        if state.ctx.is_user_team(slot.tid) {
            break;
        }
        picked.extend(auto_pick(state)?);
    }
    Ok(picked)
}

/// Auto-picks every remaining slot, the user's included.
pub fn until_end(state: &mut LeagueState) -> Result<Vec<u32>> {
    let mut picked = Vec::new();
    while on_the_clock(state).is_some() {
        picked.extend(auto_pick(state)?);
    }
    Ok(picked)
}

// ========================
// Phase steps
// ========================

/// Playoffs over: awards, then check the classes the draft will need.
pub(super) fn enter_before_draft(state: &mut LeagueState) -> Result<()> {
    awards::award_season(state);
    let expiring = state.store.get_all::<Player>().filter(|p| p.tid.is_team() && p.contract.exp <= state.ctx.season).count();
    debug!(expiring, "contracts expire this season");
    require_draft_classes(state)
}

pub(super) fn require_draft_classes(state: &LeagueState) -> Result<()> {
    for class in Owner::draft_classes() {
        if state.store.players_with_owner(class).is_empty() {
            return Err(LeagueError::MissingDraftClass(class));
        }
    }
    Ok(())
}

/// Builds the order from this season's picks, worst record first in every
/// round.
pub(super) fn enter_draft(state: &mut LeagueState) -> Result<()> {
    let season = state.ctx.season;
    let mut order = standings(state, season);
    order.reverse();

    let mut slots = Vec::new();
    for round in 1..=state.ctx.settings.draft_rounds {
        let picks = state.store.index_get::<DraftPick>("season, round", &[season as i64, round as i64])?;
        let mut pick = 0u8;
        for &original in &order {
            let Some(dp) = picks.iter().find(|dp| dp.original_tid == original) else { continue };
            pick += 1;
            slots.push(DraftSlot {
                slot: slots.len() as u32,
                round,
                pick,
                tid: dp.tid,
                original_tid: dp.original_tid,
                dpid: Some(dp.dpid),
            });
        }
    }
    info!(season, picks = slots.len(), "draft order set");
    for slot in slots {
        state.store.put(slot);
    }
    Ok(())
}

/// Unpicked prospects become free agents and the classes move up a year;
/// a new furthest class and a new season of picks are created.
pub(super) fn enter_after_draft(state: &mut LeagueState) -> Result<()> {
    let season = state.ctx.season;
    let settings = state.ctx.settings.clone();

    let undrafted: Vec<u32> = state.store.players_with_owner(Owner::Undrafted(1)).iter().map(|p| p.pid).collect();
    for pid in undrafted {
        make_free_agent(state, pid)?;
    }
    for (from, to) in [(2u8, 1u8), (3, 2)] {
        let pids: Vec<u32> = state.store.players_with_owner(Owner::Undrafted(from)).iter().map(|p| p.pid).collect();
        for pid in pids {
            state.store.update::<Player>(&pid, |p| p.tid = Owner::Undrafted(to));
        }
    }

    let mut rng = state.ctx.rng(RngStream::DraftClass);
    let first_pid = state.store.next_id::<Player>();
    let class = gen_draft_class(&mut rng, first_pid, Owner::Undrafted(3), season, season + 3, settings.draft_class_size, &settings);
    for p in class {
        state.store.put(p);
    }

    // Picks nobody used this year lapse.
    let stale: Vec<u32> = state.store.get_all::<DraftPick>().filter(|dp| dp.season <= season).map(|dp| dp.dpid).collect();
    for dpid in stale {
        state.store.delete::<DraftPick>(&dpid);
    }
    let pick_season = season + settings.future_pick_seasons;
    for round in 1..=settings.draft_rounds {
        let existing = state.store.index_get::<DraftPick>("season, round", &[pick_season as i64, round as i64])?.len();
        if existing > 0 {
            continue;
        }
        for tid in state.store.team_ids() {
            let dpid = state.store.next_id::<DraftPick>();
            state.store.put(DraftPick { dpid, season: pick_season, round, tid, original_tid: tid });
        }
    }
    require_draft_classes(state)
}

/// Every rostered player goes into one pool and teams pick in a seeded
/// random snake order until rosters are refilled.
pub(super) fn enter_fantasy_draft(state: &mut LeagueState) -> Result<()> {
    let mut teams = state.store.team_ids();
    let rostered: Vec<u32> = teams.iter().flat_map(|&tid| state.roster(tid)).map(|p| p.pid).collect();
    let rounds = rostered.len() / teams.len().max(1);
    for &pid in &rostered {
        state.store.update::<Player>(&pid, |p| {
            if let Owner::Team(tid) = p.tid {
                p.last_tid = Some(tid);
            }
            p.tid = Owner::FantasyDraftTemp;
        });
    }

    let mut rng = state.ctx.rng(RngStream::FantasyDraft);
    teams.shuffle(&mut rng);
    let mut slot = 0u32;
    for round in 1..=rounds as u8 {
        let order: Vec<u32> = if round % 2 == 1 { teams.clone() } else { teams.iter().rev().copied().collect() };
        for (i, tid) in order.into_iter().enumerate() {
            state.store.put(DraftSlot { slot, round, pick: i as u8 + 1, tid, original_tid: tid, dpid: None });
            slot += 1;
        }
    }
    info!(players = rostered.len(), rounds, "fantasy draft order set");
    Ok(())
}

/// Leftover fantasy pool players become free agents.
pub(super) fn leave_fantasy_draft(state: &mut LeagueState) -> Result<()> {
    let leftover: Vec<u32> = state.store.players_with_owner(Owner::FantasyDraftTemp).iter().map(|p| p.pid).collect();
    for pid in leftover {
        make_free_agent(state, pid)?;
    }
    Ok(())
}

pub(super) fn require_empty_order(state: &LeagueState) -> Result<()> {
    let left = state.store.count::<DraftSlot>();
    if left > 0 {
        return Err(LeagueError::precondition(state.ctx.phase, format!("{} draft picks have not been made", left)));
    }
    Ok(())
}
