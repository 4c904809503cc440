//! Playoff seeding and series progression.

use tracing::info;

use crate::config::LeagueSettings;
use crate::error::{LeagueError, Result};
use crate::models::{EventKind, Game, Matchup, Owner, PlayoffSeries, ScheduledGame, SeriesTeam, Team};
use crate::state::LeagueState;

/// Team ids ordered by regular-season record: winning percentage, then
/// wins, then tid.
pub fn standings(state: &LeagueState, season: u16) -> Vec<u32> {
    let mut rows: Vec<(u32, f64, u32)> = state
        .store
        .get_all::<Team>()
        .map(|t| t.season(season).map_or((t.tid, 0.0, 0), |s| (t.tid, s.winp(), s.won)))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)));
    rows.into_iter().map(|r| r.0).collect()
}

/// Seed order of a bracket of `n` teams (a power of two) such that the top
/// two seeds can only meet in the final: adjacent entries play each other.
pub fn bracket_order(n: usize) -> Vec<u8> {
    let mut order = vec![1u8];
    while order.len() < n {
        let size = order.len() * 2;
        order = order.iter().flat_map(|&s| [s, (size + 1) as u8 - s]).collect();
    }
    order
}

fn matchup(a: SeriesTeam, b: SeriesTeam, games_to_win: u8) -> Matchup {
    let (home, away) = if a.seed <= b.seed { (a, b) } else { (b, a) };
    Matchup { home, away, games_to_win }
}

/// Builds the first round from the standings.
pub fn seed_playoffs(settings: &LeagueSettings, season: u16, standings: &[u32]) -> PlayoffSeries {
    let num_rounds = settings.num_playoff_rounds();
    let n = (settings.num_playoff_teams() as usize).min(standings.len());
    let order = bracket_order(n);
    let team = |seed: u8| SeriesTeam { tid: standings[seed as usize - 1], seed, won: 0 };
    let first = order
        .chunks(2)
        .filter(|pair| pair.len() == 2)
        .map(|pair| matchup(team(pair[0]), team(pair[1]), settings.games_to_win(0)))
        .collect();
    PlayoffSeries { season, num_rounds, rounds: vec![first] }
}

/// Records one game result.
pub fn record_game(series: &mut PlayoffSeries, home_tid: u32, away_tid: u32, winner: u32) -> Result<()> {
    let round = series
        .rounds
        .last_mut()
        .ok_or_else(|| LeagueError::Integrity("playoff series has no rounds".into()))?;
    let m = round
        .iter_mut()
        .find(|m| {
            (m.home.tid == home_tid && m.away.tid == away_tid) || (m.home.tid == away_tid && m.away.tid == home_tid)
        })
        .ok_or_else(|| LeagueError::Integrity(format!("no series between {} and {}", home_tid, away_tid)))?;
    if m.is_decided() {
        return Err(LeagueError::Integrity(format!("series {}-{} already decided", home_tid, away_tid)));
    }
    if m.home.tid == winner {
        m.home.won += 1;
    } else {
        m.away.won += 1;
    }
    Ok(())
}

/// When every series of the current round is decided, appends the next
/// round (unless it was the final). Returns the completed round index.
pub fn advance_round(series: &mut PlayoffSeries, settings: &LeagueSettings) -> Option<usize> {
    let current = series.rounds.last()?;
    if !current.iter().all(Matchup::is_decided) {
        return None;
    }
    let completed = series.rounds.len() - 1;
    if series.rounds.len() < series.num_rounds as usize && current.len() > 1 {
        let winners: Vec<SeriesTeam> = current
            .iter()
            .filter_map(|m| {
                let tid = m.winner()?;
                let seed = if m.home.tid == tid { m.home.seed } else { m.away.seed };
                Some(SeriesTeam { tid, seed, won: 0 })
            })
            .collect();
        let games_to_win = settings.games_to_win(series.rounds.len());
        let next = winners.chunks(2).filter(|p| p.len() == 2).map(|p| matchup(p[0].clone(), p[1].clone(), games_to_win)).collect();
        series.rounds.push(next);
    } else if series.rounds.len() < series.num_rounds as usize {
        // Fewer teams than the configured bracket: the last pairing was the final.
        series.num_rounds = series.rounds.len() as u8;
    }
    Some(completed)
}

/// Schedules today's game of every undecided series. Home court follows the
/// 2-2-1-1-1 pattern.
pub fn schedule_playoff_games(state: &mut LeagueState) -> Result<usize> {
    let season = state.ctx.season;
    let day = state.ctx.day;
    let series = state
        .store
        .get::<PlayoffSeries>(&season)
        .cloned()
        .ok_or_else(|| LeagueError::Integrity(format!("no playoff series for {}", season)))?;
    let Some(round) = series.current_round() else {
        return Ok(0);
    };
    let mut count = 0;
    for m in round.iter().filter(|m| !m.is_decided()) {
        let played = m.home.won + m.away.won;
        let (home, away) = if matches!(played, 0 | 1 | 4 | 6) { (m.home.tid, m.away.tid) } else { (m.away.tid, m.home.tid) };
        let gid = state.store.next_id::<Game>().max(state.store.next_id::<ScheduledGame>());
        state.store.put(ScheduledGame { gid, day, home_tid: home, away_tid: away });
        count += 1;
    }
    Ok(count)
}

/// Updates team-season playoff results after round `completed` ends, and
/// logs the champion when it was the final.
pub fn apply_round_results(state: &mut LeagueState, series: &PlayoffSeries, completed: usize) {
    let season = state.ctx.season;
    let Some(round) = series.rounds.get(completed) else { return };
    for m in round {
        let Some(winner) = m.winner() else { continue };
        for tid in [m.home.tid, m.away.tid] {
            let won = if tid == winner { completed as i8 + 1 } else { completed as i8 };
            state.store.update::<Team>(&tid, |t| {
                if let Some(row) = t.season_mut(season) {
                    row.playoff_rounds_won = row.playoff_rounds_won.max(won);
                }
            });
        }
    }
    if let Some(champion) = series.champion() {
        let abbrev = state.team_abbrev(Owner::Team(champion));
        info!(season, champion, "{} won the {} title", abbrev, season);
        state.log_event(EventKind::Playoffs, format!("{} won the {} title", abbrev, season), vec![], vec![champion]);
    }
}

/// Seeds the bracket for the current season and marks playoff teams.
pub fn start_playoffs(state: &mut LeagueState) -> Result<PlayoffSeries> {
    let season = state.ctx.season;
    let order = standings(state, season);
    let series = seed_playoffs(&state.ctx.settings, season, &order);
    for m in series.rounds.iter().flatten() {
        for tid in [m.home.tid, m.away.tid] {
            state.store.update::<Team>(&tid, |t| {
                if let Some(row) = t.season_mut(season) {
                    row.playoff_rounds_won = 0;
                }
            });
        }
    }
    state.store.put(series.clone());
    let teams: Vec<u32> = series.rounds.iter().flatten().flat_map(|m| [m.home.tid, m.away.tid]).collect();
    state.log_event(
        EventKind::Playoffs,
        format!("{} teams made the {} playoffs", teams.len(), season),
        vec![],
        teams,
    );
    Ok(series)
}
