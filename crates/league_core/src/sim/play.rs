//! Day-by-day game play: picks the day's games, simulates them in parallel
//! from one snapshot and folds the results back into the store.

use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

use super::feats::detect_feats;
use super::game_sim::{GameInput, GameOutcome, GameSimulator, PlayerInput, TeamInput};
use super::playoffs::{advance_round, apply_round_results, record_game, schedule_playoff_games};
use crate::context::RngStream;
use crate::error::{LeagueError, Result};
use crate::events::{EventSet, UpdateEvent};
use crate::models::{EventKind, Feat, Game, Injury, Phase, Player, PlayerStatsRow, PlayoffSeries, ScheduledGame, Team};
use crate::state::LeagueState;

/// What one simulated day changed.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub day: u16,
    pub gids: Vec<u32>,
    pub events: EventSet,
}

fn playing_phase(phase: Phase) -> bool {
    phase.is_regular_season() || phase == Phase::Playoffs
}

/// Scheduled games of the earliest remaining day, scheduling the next
/// playoff games when the bracket needs them. Empty when the phase has no
/// games left.
pub fn prepare_day(state: &mut LeagueState) -> Result<Vec<ScheduledGame>> {
    if !playing_phase(state.ctx.phase) {
        return Err(LeagueError::precondition(state.ctx.phase, "no games are played in this phase"));
    }
    if state.ctx.phase == Phase::Playoffs && state.store.count::<ScheduledGame>() == 0 {
        let done = state.store.get::<PlayoffSeries>(&state.ctx.season).map_or(true, PlayoffSeries::is_complete);
        if done {
            return Ok(Vec::new());
        }
        schedule_playoff_games(state)?;
    }
    Ok(next_day_games(state))
}

pub fn next_day_games(state: &LeagueState) -> Vec<ScheduledGame> {
    let Some(day) = state.store.get_all::<ScheduledGame>().map(|g| g.day).min() else {
        return Vec::new();
    };
    state.store.index_get::<ScheduledGame>("day", &[day as i64]).unwrap_or_default().into_iter().cloned().collect()
}

fn team_input(state: &LeagueState, tid: u32) -> TeamInput {
    let players = state
        .roster(tid)
        .into_iter()
        .filter_map(|p| {
            let ratings = p.latest_rating()?.clone();
            Some(PlayerInput { pid: p.pid, name: p.name.clone(), ratings, injured: p.is_injured() })
        })
        .collect();
    TeamInput { tid, players }
}

pub fn game_inputs(state: &LeagueState, games: &[ScheduledGame]) -> Vec<GameInput> {
    let playoffs = state.ctx.phase == Phase::Playoffs;
    games
        .iter()
        .map(|g| GameInput {
            gid: g.gid,
            season: state.ctx.season,
            day: state.ctx.day,
            playoffs,
            teams: [team_input(state, g.home_tid), team_input(state, g.away_tid)],
            injury_rate: state.ctx.settings.injury_rate,
        })
        .collect()
}

/// Simulates `games` in parallel. Read-only; each game draws from its own
/// RNG stream so the result does not depend on thread scheduling.
pub fn simulate_games(state: &LeagueState, games: &[ScheduledGame], sim: &dyn GameSimulator) -> Vec<GameOutcome> {
    game_inputs(state, games)
        .par_iter()
        .map(|input| {
            let mut rng = state.ctx.rng(RngStream::Game(input.gid));
            sim.simulate(input, &mut rng)
        })
        .collect()
}

fn add_player_stats(state: &mut LeagueState, game: &Game) {
    for team in &game.teams {
        for p in &team.players {
            let existing = state.store.stats_row(p.pid, game.season, game.playoffs).map(|r| r.psid);
            match existing {
                Some(psid) => {
                    state.store.update::<PlayerStatsRow>(&psid, |row| {
                        row.line.add(&p.line);
                        row.tid = team.tid;
                    });
                }
                None => {
                    let psid = state.store.next_id::<PlayerStatsRow>();
                    state.store.put(PlayerStatsRow {
                        psid,
                        pid: p.pid,
                        tid: team.tid,
                        season: game.season,
                        playoffs: game.playoffs,
                        line: p.line,
                    });
                }
            }
        }
    }
}

fn add_team_results(state: &mut LeagueState, game: &Game) {
    let winner = game.winner();
    for (idx, team) in game.teams.iter().enumerate() {
        let opp_pts = game.teams[1 - idx].pts;
        state.store.update::<Team>(&team.tid, |t| {
            if !game.playoffs {
                if let Some(row) = t.season_mut(game.season) {
                    if team.tid == winner {
                        row.won += 1;
                    } else {
                        row.lost += 1;
                    }
                }
            }
            let row = t.stats_row_mut(game.season, game.playoffs);
            row.line.add(&team.line);
            row.opp_pts += opp_pts;
        });
    }
}

/// Folds the outcomes of `games` into the store and moves the clock one day.
/// Nothing is written when any game fails to apply.
pub fn apply_day(state: &mut LeagueState, games: &[ScheduledGame], outcomes: Vec<GameOutcome>) -> Result<DaySummary> {
    state.transaction(|s| fold_day(s, games, outcomes))
}

fn fold_day(state: &mut LeagueState, games: &[ScheduledGame], outcomes: Vec<GameOutcome>) -> Result<DaySummary> {
    let mut events = EventSet::of([UpdateEvent::GameSim]);
    let day = state.ctx.day;
    let max_feats = state.ctx.settings.max_feats_per_game;

    // Injured players on teams that played are one game closer to returning.
    let played: HashSet<u32> = games.iter().flat_map(|g| [g.home_tid, g.away_tid]).collect();
    let healing: Vec<u32> = played
        .iter()
        .flat_map(|&tid| state.roster(tid))
        .filter(|p| p.is_injured())
        .map(|p| p.pid)
        .collect();
    for pid in healing {
        state.store.update::<Player>(&pid, |p| {
            p.injury.games_remaining = p.injury.games_remaining.saturating_sub(1);
            if p.injury.games_remaining == 0 {
                p.injury = Injury::healthy();
            }
        });
    }

    let mut series = state.store.get::<PlayoffSeries>(&state.ctx.season).cloned();
    let mut gids = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let game = outcome.game;
        add_team_results(state, &game);
        add_player_stats(state, &game);

        let first_feat = state.store.next_id::<Feat>();
        for feat in detect_feats(&game, first_feat, max_feats) {
            state.store.put(feat);
        }

        for (pid, injury) in outcome.injuries {
            let name = state.store.get::<Player>(&pid).map(|p| p.name.clone()).unwrap_or_default();
            let text = format!("{} is out {} games ({})", name, injury.games_remaining, injury.kind);
            let tid = state.store.get::<Player>(&pid).and_then(|p| p.tid.team());
            state.store.update::<Player>(&pid, |p| p.injury = injury);
            state.log_event(EventKind::Injury, text, vec![pid], tid.into_iter().collect());
        }

        if game.playoffs {
            if let Some(series) = series.as_mut() {
                record_game(series, game.teams[0].tid, game.teams[1].tid, game.winner())?;
            }
        }
        state.store.delete::<ScheduledGame>(&game.gid);
        gids.push(game.gid);
        state.store.put(game);
    }

    if let Some(mut series) = series {
        if let Some(completed) = advance_round(&mut series, &state.ctx.settings) {
            apply_round_results(state, &series, completed);
        }
        state.store.put(series);
    }

    state.ctx.day += 1;
    if pass_trade_deadline(state)? {
        events.insert(UpdateEvent::NewPhase);
        events.insert(UpdateEvent::GameAttributes);
    }
    state.sync_game_attributes()?;
    debug!(day, games = gids.len(), "played day");
    Ok(DaySummary { day, gids, events })
}

/// Moves to AFTER_TRADE_DEADLINE once every team has played the configured
/// number of games.
fn pass_trade_deadline(state: &mut LeagueState) -> Result<bool> {
    if state.ctx.phase != Phase::RegularSeason {
        return Ok(false);
    }
    let Some(deadline) = state.ctx.settings.trade_deadline_games() else {
        return Ok(false);
    };
    let season = state.ctx.season;
    let fewest = state.store.get_all::<Team>().map(|t| t.season(season).map_or(0, |s| s.games())).min().unwrap_or(0);
    if fewest < deadline {
        return Ok(false);
    }
    state.ctx.phase = Phase::AfterTradeDeadline;
    info!(season, games = fewest, "trade deadline passed");
    state.log_event(EventKind::NewPhase, "The trade deadline has passed".to_string(), vec![], vec![]);
    Ok(true)
}

/// Plays one day. `None` when no games are left in the phase.
pub fn play_day(state: &mut LeagueState, sim: &dyn GameSimulator) -> Result<Option<DaySummary>> {
    let games = prepare_day(state)?;
    if games.is_empty() {
        return Ok(None);
    }
    let outcomes = simulate_games(state, &games, sim);
    apply_day(state, &games, outcomes).map(Some)
}

/// Plays up to `days` days, stopping early when the phase runs out of games.
pub fn play_days(state: &mut LeagueState, days: u32, sim: &dyn GameSimulator) -> Result<EventSet> {
    let mut events = EventSet::new();
    for _ in 0..days {
        match play_day(state, sim)? {
            Some(summary) => events.extend(summary.events),
            None => break,
        }
    }
    Ok(events)
}

/// Plays every remaining game of the regular season or the playoffs.
pub fn play_until_end(state: &mut LeagueState, sim: &dyn GameSimulator) -> Result<EventSet> {
    let mut events = EventSet::new();
    let mut days = 0u32;
    while let Some(summary) = play_day(state, sim)? {
        events.extend(summary.events);
        days += 1;
    }
    info!(days, phase = %state.ctx.phase, "played until end of phase");
    Ok(events)
}

/// Regular-season games still on the schedule.
pub fn games_remaining(state: &LeagueState) -> usize {
    state.store.count::<ScheduledGame>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::game_sim::RatingsSimulator;
    use crate::sim::playoffs::start_playoffs;
    use crate::sim::schedule::round_robin;
    use crate::testutil::sample_state;

    fn regular_season() -> LeagueState {
        let mut state = sample_state();
        state.ctx.phase = Phase::RegularSeason;
        let mut rng = state.ctx.rng(RngStream::Schedule);
        let tids = state.store.team_ids();
        for g in round_robin(&mut rng, &tids, state.ctx.settings.num_games, 0) {
            state.store.put(g);
        }
        state
    }

    #[test]
    fn test_play_day_records_results() {
        let mut state = regular_season();
        let summary = play_day(&mut state, &RatingsSimulator::default()).unwrap().unwrap();
        assert_eq!(summary.gids.len(), 2);
        assert_eq!(state.ctx.day, 1);
        assert_eq!(state.store.count::<Game>(), 2);
        assert_eq!(games_remaining(&state), 10);

        let (won, lost): (u32, u32) = state
            .store
            .get_all::<Team>()
            .map(|t| t.season(2025).map_or((0, 0), |s| (s.won, s.lost)))
            .fold((0, 0), |acc, x| (acc.0 + x.0, acc.1 + x.1));
        assert_eq!((won, lost), (2, 2));

        let game = state.store.get::<Game>(&summary.gids[0]).unwrap();
        let pid = game.teams[0].players[0].pid;
        let row = state.store.stats_row(pid, 2025, false).unwrap();
        assert_eq!(row.line, game.teams[0].players[0].line);
    }

    #[test]
    fn test_season_passes_trade_deadline_and_ends() {
        let mut state = regular_season();
        let events = play_until_end(&mut state, &RatingsSimulator::default()).unwrap();
        assert!(events.contains(UpdateEvent::NewPhase));
        assert_eq!(state.ctx.phase, Phase::AfterTradeDeadline);
        assert_eq!(games_remaining(&state), 0);
        for t in state.store.get_all::<Team>() {
            assert_eq!(t.season(2025).unwrap().games(), 6);
        }
        state.store.check_integrity().unwrap();
        assert!(play_day(&mut state, &RatingsSimulator::default()).unwrap().is_none());
    }

    #[test]
    fn test_simulation_is_reproducible() {
        let run = || {
            let mut state = regular_season();
            play_days(&mut state, 3, &RatingsSimulator::default()).unwrap();
            state.store.get_all::<Game>().cloned().collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_playoffs_crown_a_champion() {
        let mut state = regular_season();
        play_until_end(&mut state, &RatingsSimulator::default()).unwrap();
        state.ctx.phase = Phase::Playoffs;
        state.ctx.day = 0;
        start_playoffs(&mut state).unwrap();
        play_until_end(&mut state, &RatingsSimulator::default()).unwrap();

        let series = state.store.get::<PlayoffSeries>(&2025).unwrap();
        let champion = series.champion().unwrap();
        let team = state.store.get::<Team>(&champion).unwrap();
        assert_eq!(team.season(2025).unwrap().playoff_rounds_won, 1);
        // Playoff games do not touch the regular-season record.
        assert_eq!(team.season(2025).unwrap().games(), 6);
        assert!(state.store.get_all::<Game>().any(|g| g.playoffs));
    }

    #[test]
    fn test_no_games_outside_season() {
        let mut state = sample_state();
        let err = play_day(&mut state, &RatingsSimulator::default()).unwrap_err();
        assert!(matches!(err, LeagueError::PhasePrecondition { .. }));
    }

    #[test]
    fn test_failed_day_leaves_store_untouched() {
        let mut state = regular_season();
        play_until_end(&mut state, &RatingsSimulator::default()).unwrap();
        state.ctx.phase = Phase::Playoffs;
        state.ctx.day = 0;
        start_playoffs(&mut state).unwrap();

        let games = prepare_day(&mut state).unwrap();
        let outcomes = simulate_games(&state, &games, &RatingsSimulator::default());
        let mut series = state.store.get::<PlayoffSeries>(&2025).cloned().unwrap();
        let last = games.last().unwrap();
        for m in series.rounds.last_mut().unwrap() {
            if m.home.tid == last.home_tid || m.home.tid == last.away_tid {
                m.home.won = m.games_to_win;
            }
        }
        state.store.put(series);

        let revision = state.store.revision();
        let (played, stats) = (state.store.count::<Game>(), state.store.count::<PlayerStatsRow>());
        let err = apply_day(&mut state, &games, outcomes).unwrap_err();
        assert!(matches!(err, LeagueError::Integrity(_)));
        assert_eq!(state.store.revision(), revision);
        assert_eq!(state.store.count::<Game>(), played);
        assert_eq!(state.store.count::<PlayerStatsRow>(), stats);
        assert!(games.iter().all(|g| state.store.get::<ScheduledGame>(&g.gid).is_some()));
        assert_eq!(state.ctx.day, 0);
    }
}
