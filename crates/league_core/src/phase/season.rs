//! In-season phase steps and the rollover into a new season.

use tracing::{debug, info};

use crate::context::RngStream;
use crate::error::{LeagueError, Result};
use crate::market::{auto_sign, decay_asks, expire_released_players, fix_ai_rosters};
use crate::models::{EventKind, Game, Injury, Negotiation, Owner, Player, PlayoffSeries, ScheduledGame, Team, TeamSeason};
use crate::player::{develop_player, gen_fuzz, update_values, DevelopmentModel};
use crate::sim::{round_robin, start_playoffs};
use crate::state::LeagueState;

/// Season rollover, run after the phase has moved to PRESEASON and the
/// season counter has been bumped: leftover free agency, aging, retirement
/// and fresh team-season rows.
pub(super) fn enter_new_season(state: &mut LeagueState, dev: &dyn DevelopmentModel) -> Result<()> {
    let season = state.ctx.season;
    state.ctx.day = 0;

    let mut rng = state.ctx.rng(RngStream::FreeAgency);
    auto_sign(state, &mut rng)?;
    decay_asks(state);

    let mut rng = state.ctx.rng(RngStream::Development);
    let active: Vec<u32> = state.store.get_all::<Player>().filter(|p| p.tid != Owner::Retired).map(|p| p.pid).collect();
    for &pid in &active {
        let fuzz = gen_fuzz(&mut rng);
        state.store.update::<Player>(&pid, |p| {
            develop_player(dev, p, season, fuzz, &mut rng);
            update_values(p, season);
            p.injury = Injury::healthy();
        });
    }

    let mut rng = state.ctx.rng(RngStream::Retirement);
    let mut retired = 0;
    for pid in active {
        let Some(p) = state.store.get::<Player>(&pid) else { continue };
        if !(p.tid.is_team() || p.tid == Owner::FreeAgent) || !dev.should_retire(p, season, &mut rng) {
            continue;
        }
        let text = format!("{} retired at age {}", p.name, p.age(season));
        let tids: Vec<u32> = p.tid.team().or(p.last_tid).into_iter().collect();
        state.store.update::<Player>(&pid, |p| {
            if let Owner::Team(tid) = p.tid {
                p.last_tid = Some(tid);
            }
            p.tid = Owner::Retired;
            p.retired_year = Some(season);
            p.contract_desired = None;
        });
        state.store.delete::<Negotiation>(&pid);
        state.log_event(EventKind::Retired, text, vec![pid], tids);
        retired += 1;
    }

    for tid in state.store.team_ids() {
        state.store.update::<Team>(&tid, |t| {
            if t.season(season).is_some() {
                return;
            }
            // Hype drifts halfway back to average, then follows last year's record.
            let (hype, pop) = t.season(season - 1).map_or((0.5, t.pop), |s| {
                let hype = 0.5 * s.hype + 0.25 + 0.5 * (s.winp() - 0.5);
                (hype.clamp(0.0, 1.0), s.pop)
            });
            t.seasons.push(TeamSeason::new(season, hype, pop));
        });
    }

    expire_released_players(state);
    info!(season, developed = state.store.count::<Player>(), retired, "new season");
    Ok(())
}

/// The user's roster must already be legal; AI rosters are fixed here.
pub(super) fn check_user_roster(state: &LeagueState) -> Result<()> {
    let tid = state.ctx.user_tid;
    let size = state.roster_size(tid);
    let (min, max) = (state.ctx.settings.min_roster, state.ctx.settings.max_roster);
    if size > max {
        return Err(LeagueError::precondition(
            state.ctx.phase,
            format!("your roster has {} players, release {} before the season starts", size, size - max),
        ));
    }
    if size < min {
        return Err(LeagueError::precondition(
            state.ctx.phase,
            format!("your roster has {} players, sign {} before the season starts", size, min - size),
        ));
    }
    Ok(())
}

pub(super) fn enter_regular_season(state: &mut LeagueState) -> Result<()> {
    let mut rng = state.ctx.rng(RngStream::FreeAgency);
    fix_ai_rosters(state, &mut rng)?;
    let (min, max) = (state.ctx.settings.min_roster, state.ctx.settings.max_roster);
    for tid in state.store.team_ids() {
        let size = state.roster_size(tid);
        if size < min || size > max {
            return Err(LeagueError::precondition(state.ctx.phase, format!("team {} has {} players", tid, size)));
        }
    }

    state.ctx.day = 0;
    let mut rng = state.ctx.rng(RngStream::Schedule);
    let first_gid = state.store.next_id::<Game>();
    let schedule = round_robin(&mut rng, &state.store.team_ids(), state.ctx.settings.num_games, first_gid);
    info!(season = state.ctx.season, games = schedule.len(), "schedule generated");
    for game in schedule {
        state.store.put(game);
    }
    Ok(())
}

pub(super) fn check_schedule_played(state: &LeagueState) -> Result<()> {
    let left = state.store.count::<ScheduledGame>();
    if left > 0 {
        return Err(LeagueError::precondition(state.ctx.phase, format!("{} regular season games remain", left)));
    }
    Ok(())
}

pub(super) fn enter_playoffs(state: &mut LeagueState) -> Result<()> {
    let series = start_playoffs(state)?;
    debug!(rounds = series.num_rounds, "playoffs seeded");
    Ok(())
}

pub(super) fn check_playoffs_done(state: &LeagueState) -> Result<()> {
    let done = state.store.get::<PlayoffSeries>(&state.ctx.season).map_or(false, PlayoffSeries::is_complete);
    if !done {
        return Err(LeagueError::precondition(state.ctx.phase, "the playoffs are not over"));
    }
    Ok(())
}
