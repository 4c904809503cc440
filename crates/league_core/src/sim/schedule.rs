//! Regular-season schedule generation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::ScheduledGame;

/// Round-robin schedule giving every team `num_games` games, built with the
/// circle method: team 0 stays fixed while the others rotate. Rotations
/// repeat with home and away swapped until every team is full. Each round is
/// one day, so no team plays twice on a day.
///
/// With an odd number of teams one team sits out each round; if
/// `tids.len() * num_games` is odd the last team ends one game short.
pub fn round_robin<R: Rng + ?Sized>(rng: &mut R, tids: &[u32], num_games: u32, first_gid: u32) -> Vec<ScheduledGame> {
    let mut teams: Vec<Option<u32>> = tids.iter().copied().map(Some).collect();
    teams.shuffle(rng);
    if teams.len() % 2 == 1 {
        teams.push(None);
    }
    let n = teams.len();
    if n < 2 {
        return Vec::new();
    }

    let mut played = std::collections::HashMap::<u32, u32>::new();
    let mut games = Vec::new();
    let mut gid = first_gid;
    let rounds_per_cycle = n - 1;
    // Enough cycles to fill every team even with byes.
    let max_rounds = (num_games as usize + 1) * n;

    for round in 0..max_rounds {
        if tids.iter().all(|t| played.get(t).copied().unwrap_or(0) >= num_games) {
            break;
        }
        let swap = (round / rounds_per_cycle) % 2 == 1;
        let r = round % rounds_per_cycle;
        // Rotation of positions 1..n by r steps.
        let rotated: Vec<Option<u32>> = std::iter::once(teams[0])
            .chain((0..n - 1).map(|i| teams[1 + (i + r) % (n - 1)]))
            .collect();

        let mut scheduled_today = false;
        for i in 0..n / 2 {
            let (Some(a), Some(b)) = (rotated[i], rotated[n - 1 - i]) else { continue };
            if played.get(&a).copied().unwrap_or(0) >= num_games || played.get(&b).copied().unwrap_or(0) >= num_games {
                continue;
            }
            // Alternate home within a cycle so nobody hosts every game.
            let a_home = (i + r) % 2 == 0;
            let (home, away) = if a_home != swap { (a, b) } else { (b, a) };
            games.push(ScheduledGame { gid, day: round as u16, home_tid: home, away_tid: away });
            gid += 1;
            *played.entry(a).or_default() += 1;
            *played.entry(b).or_default() += 1;
            scheduled_today = true;
        }
        if !scheduled_today && round > 2 * n {
            break;
        }
    }

    // Days numbered without gaps.
    let mut days: Vec<u16> = games.iter().map(|g| g.day).collect();
    days.dedup();
    for g in &mut games {
        g.day = days.binary_search(&g.day).unwrap_or(0) as u16;
    }
    games
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::{HashMap, HashSet};

    fn counts(games: &[ScheduledGame]) -> HashMap<u32, u32> {
        let mut c = HashMap::new();
        for g in games {
            *c.entry(g.home_tid).or_insert(0) += 1;
            *c.entry(g.away_tid).or_insert(0) += 1;
        }
        c
    }

    #[test]
    fn test_every_team_gets_its_games() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let tids: Vec<u32> = (0..30).collect();
        let games = round_robin(&mut rng, &tids, 82, 0);
        assert_eq!(games.len(), 30 * 82 / 2);
        assert!(counts(&games).values().all(|&c| c == 82));
    }

    #[test]
    fn test_one_game_per_team_per_day() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let tids: Vec<u32> = (0..4).collect();
        let games = round_robin(&mut rng, &tids, 6, 100);
        assert_eq!(games.len(), 12);
        let mut seen = HashSet::new();
        for g in &games {
            assert!(g.home_tid != g.away_tid);
            assert!(seen.insert((g.day, g.home_tid)));
            assert!(seen.insert((g.day, g.away_tid)));
        }
        assert_eq!(games[0].gid, 100);
        assert_eq!(games.iter().map(|g| g.day).max(), Some(5));
    }

    #[test]
    fn test_odd_team_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tids: Vec<u32> = (0..5).collect();
        let games = round_robin(&mut rng, &tids, 4, 0);
        assert_eq!(games.len(), 10);
        assert!(counts(&games).values().all(|&c| c == 4));
    }
}
