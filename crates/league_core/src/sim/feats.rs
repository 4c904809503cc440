//! Notable single-game performances.

use crate::models::{Feat, Game, StatLine};

pub const PTS_FEAT: u32 = 40;
pub const TRB_FEAT: u32 = 20;
pub const AST_FEAT: u32 = 15;
pub const STL_FEAT: u32 = 7;
pub const BLK_FEAT: u32 = 7;

pub fn is_feat(line: &StatLine) -> bool {
    line.pts >= PTS_FEAT
        || line.trb() >= TRB_FEAT
        || line.ast >= AST_FEAT
        || line.stl >= STL_FEAT
        || line.blk >= BLK_FEAT
        || line.double_digit_categories() >= 3
}

/// Rough size of a performance, used to keep the best ones when a game has
/// more feats than the cap.
fn score(line: &StatLine) -> u32 {
    line.pts + line.trb() + line.ast + 2 * (line.stl + line.blk)
}

/// Feats of `game`, best first, at most `max`. Ids start at `first_id`.
pub fn detect_feats(game: &Game, first_id: u32, max: usize) -> Vec<Feat> {
    let winner = game.winner();
    let score_text = game.score();
    let mut found: Vec<(u32, Feat)> = Vec::new();
    for (idx, team) in game.teams.iter().enumerate() {
        let opp = &game.teams[1 - idx];
        for p in team.players.iter().filter(|p| is_feat(&p.line)) {
            found.push((
                score(&p.line),
                Feat {
                    feat_id: 0,
                    fid: game.gid,
                    pid: p.pid,
                    name: p.name.clone(),
                    tid: team.tid,
                    opp_tid: opp.tid,
                    season: game.season,
                    playoffs: game.playoffs,
                    won: team.tid == winner,
                    score: score_text.clone(),
                    line: p.line,
                },
            ));
        }
    }
    found.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.pid.cmp(&b.1.pid)));
    found
        .into_iter()
        .take(max)
        .enumerate()
        .map(|(i, (_, mut feat))| {
            feat.feat_id = first_id + i as u32;
            feat
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoxPlayer, BoxTeam};

    fn player(pid: u32, line: StatLine) -> BoxPlayer {
        BoxPlayer { pid, name: format!("P{}", pid), starter: true, line }
    }

    fn game(home: Vec<BoxPlayer>, away: Vec<BoxPlayer>) -> Game {
        let team = |tid, players: Vec<BoxPlayer>| {
            let pts = players.iter().map(|p| p.line.pts).sum();
            BoxTeam { tid, pts, line: StatLine::default(), players }
        };
        Game { gid: 12, season: 2025, playoffs: false, day: 3, overtimes: 0, teams: [team(0, home), team(1, away)] }
    }

    #[test]
    fn test_thresholds() {
        assert!(is_feat(&StatLine { pts: 40, ..Default::default() }));
        assert!(!is_feat(&StatLine { pts: 39, ..Default::default() }));
        assert!(is_feat(&StatLine { pts: 10, orb: 2, drb: 8, ast: 10, ..Default::default() }));
        assert!(is_feat(&StatLine { blk: 7, ..Default::default() }));
    }

    #[test]
    fn test_detect_and_cap() {
        let g = game(
            vec![player(1, StatLine { pts: 45, ..Default::default() }), player(2, StatLine { pts: 12, ..Default::default() })],
            vec![
                player(3, StatLine { pts: 41, ..Default::default() }),
                player(4, StatLine { ast: 16, ..Default::default() }),
            ],
        );
        let feats = detect_feats(&g, 100, 2);
        assert_eq!(feats.len(), 2);
        assert_eq!(feats[0].pid, 1);
        assert_eq!(feats[0].feat_id, 100);
        assert!(feats[0].won);
        assert_eq!(feats[0].opp_tid, 1);
        assert_eq!(feats[1].pid, 3);
        assert!(!feats[1].won);
        assert_eq!(feats[1].score, "57-41");
    }
}
