//! End-of-season awards, handed out when the playoffs are over.

use tracing::info;

use crate::models::{Award, AwardKind, EventKind, Player, PlayerStatsRow, PlayoffSeries, StatLine, Team};
use crate::state::LeagueState;

struct Candidate {
    pid: u32,
    tid: u32,
    line: StatLine,
}

impl Candidate {
    fn per_game(&self, total: u32) -> f64 {
        if self.line.gp == 0 {
            0.0
        } else {
            total as f64 / self.line.gp as f64
        }
    }

    /// Per-game box-score impact used for MVP and rookie of the year.
    fn impact(&self) -> f64 {
        let l = &self.line;
        let raw = l.pts as f64 + 0.8 * l.trb() as f64 + l.ast as f64 + 1.5 * (l.stl + l.blk) as f64 - l.tov as f64;
        if l.gp == 0 {
            0.0
        } else {
            raw / l.gp as f64
        }
    }
}

/// Regular-season lines of players who appeared in at least half the games.
fn qualified(state: &LeagueState, season: u16) -> Vec<Candidate> {
    let min_gp = state.ctx.settings.num_games.div_ceil(2);
    state
        .store
        .index_prefix::<PlayerStatsRow>("season, playoffs, tid", &[season as i64, 0])
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.line.gp >= min_gp)
        .map(|r| Candidate { pid: r.pid, tid: r.tid, line: r.line })
        .collect()
}

fn best<'a>(candidates: impl Iterator<Item = &'a Candidate>, score: impl Fn(&Candidate) -> f64) -> Option<&'a Candidate> {
    let mut ranked: Vec<(&Candidate, f64)> = candidates.map(|c| (c, score(c))).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.pid.cmp(&b.0.pid)));
    ranked.into_iter().next().map(|(c, _)| c)
}

fn player_award(state: &LeagueState, aid: u32, season: u16, kind: AwardKind, c: &Candidate) -> Award {
    let name = state.store.get::<Player>(&c.pid).map(|p| p.name.clone()).unwrap_or_default();
    Award { aid, season, kind, pid: Some(c.pid), tid: c.tid, name }
}

/// Computes and stores this season's awards. Returns what was awarded.
pub fn award_season(state: &mut LeagueState) -> Vec<Award> {
    let season = state.ctx.season;
    let candidates = qualified(state, season);
    let mut awards = Vec::new();
    let mut aid = state.store.next_id::<Award>();

    let champion = state.store.get::<PlayoffSeries>(&season).and_then(PlayoffSeries::champion);
    if let Some(tid) = champion {
        let name = state.store.get::<Team>(&tid).map(Team::full_name).unwrap_or_default();
        awards.push(Award { aid, season, kind: AwardKind::Champion, pid: None, tid, name });
        aid += 1;
    }

    let rookie = |c: &&Candidate| state.store.get::<Player>(&c.pid).map_or(false, |p| p.draft.year + 1 == season);
    let picks = [
        (AwardKind::Mvp, best(candidates.iter(), Candidate::impact)),
        (AwardKind::RookieOfTheYear, best(candidates.iter().filter(rookie), Candidate::impact)),
        (AwardKind::ScoringLeader, best(candidates.iter(), |c| c.per_game(c.line.pts))),
        (AwardKind::ReboundingLeader, best(candidates.iter(), |c| c.per_game(c.line.trb()))),
        (AwardKind::AssistsLeader, best(candidates.iter(), |c| c.per_game(c.line.ast))),
    ];
    for (kind, winner) in picks {
        if let Some(c) = winner {
            awards.push(player_award(state, aid, season, kind, c));
            aid += 1;
        }
    }

    for award in &awards {
        let text = format!("{} won the {} {:?} award", award.name, season, award.kind);
        info!(season, kind = ?award.kind, tid = award.tid, "{}", text);
        state.log_event(EventKind::Award, text, award.pid.into_iter().collect(), vec![award.tid]);
        state.store.put(award.clone());
    }
    awards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sample_state;

    fn add_row(state: &mut LeagueState, pid: u32, tid: u32, line: StatLine) {
        let psid = state.store.next_id::<PlayerStatsRow>();
        state.store.put(PlayerStatsRow { psid, pid, tid, season: 2025, playoffs: false, line });
    }

    #[test]
    fn test_leaders_need_enough_games() {
        let mut state = sample_state();
        for pid in [0, 1, 2] {
            state.store.update::<Player>(&pid, |p| p.draft.year = 2015);
        }
        add_row(&mut state, 0, 0, StatLine { gp: 6, pts: 120, orb: 10, drb: 20, ast: 30, ..Default::default() });
        add_row(&mut state, 1, 0, StatLine { gp: 6, pts: 60, orb: 20, drb: 40, ast: 12, ..Default::default() });
        // Best per-game scorer, but only two games played.
        add_row(&mut state, 2, 1, StatLine { gp: 2, pts: 80, ..Default::default() });

        let awards = award_season(&mut state);
        let winner = |kind| awards.iter().find(|a| a.kind == kind).and_then(|a| a.pid);
        assert_eq!(winner(AwardKind::ScoringLeader), Some(0));
        assert_eq!(winner(AwardKind::ReboundingLeader), Some(1));
        assert_eq!(winner(AwardKind::AssistsLeader), Some(0));
        assert_eq!(winner(AwardKind::Mvp), Some(0));
        // No first-year players qualified, no playoffs played.
        assert_eq!(winner(AwardKind::RookieOfTheYear), None);
        assert!(awards.iter().all(|a| a.kind != AwardKind::Champion));
        assert_eq!(state.store.count::<Award>(), awards.len());
    }
}
