//! Single-game simulation.
//!
//! The day runner only depends on [`GameSimulator`]. [`RatingsSimulator`]
//! is the default: a box-score generator driven by player ratings, not a
//! possession-by-possession engine.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Binomial, Distribution, Normal};

use crate::models::{BoxPlayer, BoxTeam, Game, Injury, RatingSnapshot, StatLine};

/// A player available to a team for one game.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInput {
    pub pid: u32,
    pub name: String,
    pub ratings: RatingSnapshot,
    pub injured: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamInput {
    pub tid: u32,
    pub players: Vec<PlayerInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameInput {
    pub gid: u32,
    pub season: u16,
    pub day: u16,
    pub playoffs: bool,
    /// `[home, away]`.
    pub teams: [TeamInput; 2],
    /// Injury chance per player per 48 minutes played.
    pub injury_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOutcome {
    pub game: Game,
    /// New injuries suffered during the game.
    pub injuries: Vec<(u32, Injury)>,
}

pub trait GameSimulator: Send + Sync {
    fn simulate(&self, input: &GameInput, rng: &mut ChaCha8Rng) -> GameOutcome;
}

const INJURIES: &[(&str, u16)] = &[
    ("Sprained Ankle", 6),
    ("Bruised Knee", 3),
    ("Hamstring Strain", 10),
    ("Back Spasms", 4),
    ("Broken Hand", 25),
    ("Torn Meniscus", 45),
    ("Concussion", 8),
];

const ROTATION: usize = 10;
const STARTERS: usize = 5;
const REGULATION_MINUTES: f64 = 240.0;
const HOME_EDGE: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct RatingsSimulator {
    /// Game-to-game swing in team form.
    pub form_sd: f64,
}

impl Default for RatingsSimulator {
    fn default() -> Self {
        Self { form_sd: 4.0 }
    }
}

fn binomial(rng: &mut ChaCha8Rng, n: f64, p: f64) -> u32 {
    let n = n.max(0.0).round() as u64;
    let p = p.clamp(0.0, 1.0);
    Binomial::new(n, p).map_or(0, |b| b.sample(rng) as u32)
}

/// A form swing; a non-finite spread means no swing.
fn swing(rng: &mut ChaCha8Rng, sd: f64) -> f64 {
    if !sd.is_finite() || sd <= 0.0 {
        return 0.0;
    }
    Normal::new(0.0, sd).map_or(0.0, |n| n.sample(rng))
}

fn scaled(v: u8) -> f64 {
    v as f64 / 100.0
}

impl RatingsSimulator {
    /// Healthy players by ovr, best first. Injured players fill in only when
    /// fewer than five are healthy.
    fn rotation<'a>(team: &'a TeamInput) -> Vec<&'a PlayerInput> {
        let mut healthy: Vec<&PlayerInput> = team.players.iter().filter(|p| !p.injured).collect();
        healthy.sort_by(|a, b| b.ratings.ovr.cmp(&a.ratings.ovr).then(a.pid.cmp(&b.pid)));
        if healthy.len() < STARTERS {
            let mut hurt: Vec<&PlayerInput> = team.players.iter().filter(|p| p.injured).collect();
            hurt.sort_by(|a, b| b.ratings.ovr.cmp(&a.ratings.ovr).then(a.pid.cmp(&b.pid)));
            healthy.extend(hurt.into_iter().take(STARTERS - healthy.len()));
        }
        healthy.truncate(ROTATION);
        healthy
    }

    /// Minutes weighted by ovr, starters heavier; sums to `total`.
    fn minutes(rotation: &[&PlayerInput], total: f64) -> Vec<f64> {
        let weights: Vec<f64> = rotation
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let base = (p.ratings.ovr as f64).max(1.0);
                if i < STARTERS { base * 2.0 } else { base }
            })
            .collect();
        let sum: f64 = weights.iter().sum();
        weights.iter().map(|w| (total * w / sum).min(total / 5.0 * 0.9).max(0.0)).collect()
    }

    fn strength(rotation: &[&PlayerInput], minutes: &[f64]) -> (f64, f64) {
        let total: f64 = minutes.iter().sum::<f64>().max(1.0);
        let mut off = 0.0;
        let mut def = 0.0;
        for (p, m) in rotation.iter().zip(minutes) {
            let r = &p.ratings;
            off += m * (r.ovr as f64 + r.oiq as f64) / 2.0;
            def += m * (r.diq as f64 + r.hgt as f64 + r.spd as f64 + r.ovr as f64) / 4.0;
        }
        (off / total, def / total)
    }

    fn player_line(
        &self,
        rng: &mut ChaCha8Rng,
        r: &RatingSnapshot,
        minutes: f64,
        edge: f64,
        starter: bool,
    ) -> StatLine {
        let share = minutes / 48.0;
        let fga = share * (10.0 + 14.0 * scaled(r.oiq).max(scaled(r.ovr)));
        let tpa = binomial(rng, fga, 0.1 + 0.35 * scaled(r.tp));
        let twa = (fga.round() as u32).saturating_sub(tpa);
        let two_pct = 0.38 + 0.12 * scaled(r.fg) + 0.08 * scaled(r.ins) + edge;
        let three_pct = 0.25 + 0.15 * scaled(r.tp) + edge / 2.0;
        let two = binomial(rng, twa as f64, two_pct);
        let tp = binomial(rng, tpa as f64, three_pct);
        let fta = binomial(rng, share * 8.0, 0.3 + 0.4 * scaled(r.dnk).max(scaled(r.ins)));
        let ft = binomial(rng, fta as f64, 0.55 + 0.35 * scaled(r.ft));
        let reb_chances = share * 18.0 * (0.3 + 0.7 * (scaled(r.reb) + scaled(r.hgt)) / 2.0);
        let orb = binomial(rng, reb_chances, 0.25);
        let drb = binomial(rng, reb_chances, 0.6);
        StatLine {
            gp: 1,
            gs: starter as u32,
            min: (minutes * 10.0).round() / 10.0,
            fg: two + tp,
            fga: twa + tpa,
            tp,
            tpa,
            ft,
            fta,
            orb,
            drb,
            ast: binomial(rng, share * 14.0, 0.15 + 0.6 * scaled(r.pss)),
            tov: binomial(rng, share * 6.0, 0.45 - 0.3 * scaled(r.drb)),
            stl: binomial(rng, share * 5.0, 0.1 + 0.35 * scaled(r.diq)),
            blk: binomial(rng, share * 5.0, 0.05 + 0.35 * scaled(r.hgt) * scaled(r.jmp)),
            pf: binomial(rng, share * 6.0, 0.4),
            pts: 2 * two + 3 * tp + ft,
        }
    }

    fn team_box(
        &self,
        rng: &mut ChaCha8Rng,
        team: &TeamInput,
        edge: f64,
        total_minutes: f64,
    ) -> BoxTeam {
        let rotation = Self::rotation(team);
        let minutes = Self::minutes(&rotation, total_minutes);
        let players: Vec<BoxPlayer> = rotation
            .iter()
            .zip(minutes)
            .enumerate()
            .map(|(i, (p, m))| BoxPlayer {
                pid: p.pid,
                name: p.name.clone(),
                starter: i < STARTERS,
                line: self.player_line(rng, &p.ratings, m, edge, i < STARTERS),
            })
            .collect();
        let mut line = StatLine::default();
        for p in &players {
            line.add(&p.line);
        }
        line.gp = 1;
        line.gs = 0;
        BoxTeam { tid: team.tid, pts: line.pts, line, players }
    }

    fn injuries(&self, rng: &mut ChaCha8Rng, team: &BoxTeam, rate: f64) -> Vec<(u32, Injury)> {
        let mut out = Vec::new();
        for p in &team.players {
            let chance = (rate * 100.0 * p.line.min / 48.0).clamp(0.0, 1.0);
            if chance > 0.0 && rng.gen_bool(chance) {
                let (kind, typical) = INJURIES[rng.gen_range(0..INJURIES.len())];
                let games = rng.gen_range(1..=typical * 2);
                out.push((p.pid, Injury { kind: kind.to_string(), games_remaining: games }));
            }
        }
        out
    }
}

impl GameSimulator for RatingsSimulator {
    fn simulate(&self, input: &GameInput, rng: &mut ChaCha8Rng) -> GameOutcome {
        let [home_in, away_in] = &input.teams;

        let strengths: Vec<(f64, f64)> = [home_in, away_in]
            .iter()
            .map(|t| {
                let rotation = Self::rotation(t);
                let minutes = Self::minutes(&rotation, REGULATION_MINUTES);
                Self::strength(&rotation, &minutes)
            })
            .collect();
        let home_rating = strengths[0].0 - strengths[1].1 + HOME_EDGE + swing(rng, self.form_sd);
        let away_rating = strengths[1].0 - strengths[0].1 + swing(rng, self.form_sd);
        // Shooting edge in percentage points.
        let home_edge = (home_rating - away_rating) / 400.0;

        let mut home = self.team_box(rng, home_in, home_edge, REGULATION_MINUTES);
        let mut away = self.team_box(rng, away_in, -home_edge, REGULATION_MINUTES);

        // Overtime: a five-minute period per tie, decided by a late basket
        // for the stronger side with some luck.
        let mut overtimes = 0u8;
        while home.pts == away.pts {
            overtimes += 1;
            let home_wins = rng.gen_bool((0.5 + home_edge * 5.0).clamp(0.1, 0.9));
            let winner = if home_wins { &mut home } else { &mut away };
            if let Some(p) = winner.players.first_mut() {
                p.line.fg += 1;
                p.line.fga += 1;
                p.line.pts += 2;
                p.line.min += 5.0;
            }
            winner.line.fg += 1;
            winner.line.fga += 1;
            winner.line.pts += 2;
            winner.pts += 2;
        }

        let mut injuries = self.injuries(rng, &home, input.injury_rate);
        injuries.extend(self.injuries(rng, &away, input.injury_rate));

        GameOutcome {
            game: Game {
                gid: input.gid,
                season: input.season,
                playoffs: input.playoffs,
                day: input.day,
                overtimes,
                teams: [home, away],
            },
            injuries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Skill;
    use rand::SeedableRng;

    fn team(tid: u32, level: u8) -> TeamInput {
        let players = (0..10)
            .map(|i| {
                let mut ratings = RatingSnapshot { season: 2025, ovr: level, ..Default::default() };
                for skill in Skill::ALL {
                    ratings.set(skill, level);
                }
                PlayerInput { pid: tid * 100 + i, name: format!("P{}", i), ratings, injured: false }
            })
            .collect();
        TeamInput { tid, players }
    }

    fn input(home: TeamInput, away: TeamInput) -> GameInput {
        GameInput { gid: 1, season: 2025, day: 0, playoffs: false, teams: [home, away], injury_rate: 0.0 }
    }

    #[test]
    fn test_box_score_is_consistent() {
        let sim = RatingsSimulator::default();
        let outcome = sim.simulate(&input(team(0, 50), team(1, 50)), &mut ChaCha8Rng::seed_from_u64(5));
        let game = &outcome.game;
        assert_ne!(game.teams[0].pts, game.teams[1].pts);
        for t in &game.teams {
            let sum: u32 = t.players.iter().map(|p| p.line.pts).sum();
            assert_eq!(sum, t.pts);
            assert_eq!(t.line.pts, t.pts);
            assert_eq!(t.players.iter().filter(|p| p.starter).count(), 5);
            for p in &t.players {
                assert!(p.line.fg <= p.line.fga && p.line.tp <= p.line.tpa && p.line.ft <= p.line.fta);
                assert_eq!(p.line.pts, 2 * (p.line.fg - p.line.tp) + 3 * p.line.tp + p.line.ft);
            }
        }
        assert!(outcome.injuries.is_empty());
    }

    #[test]
    fn test_bad_form_spread_still_plays() {
        for form_sd in [f64::NAN, f64::INFINITY, -3.0] {
            let sim = RatingsSimulator { form_sd };
            let game = sim.simulate(&input(team(0, 50), team(1, 50)), &mut ChaCha8Rng::seed_from_u64(2)).game;
            assert_ne!(game.teams[0].pts, game.teams[1].pts);
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let sim = RatingsSimulator::default();
        let a = sim.simulate(&input(team(0, 55), team(1, 45)), &mut ChaCha8Rng::seed_from_u64(8));
        let b = sim.simulate(&input(team(0, 55), team(1, 45)), &mut ChaCha8Rng::seed_from_u64(8));
        assert_eq!(a, b);
    }

    #[test]
    fn test_better_team_usually_wins() {
        let sim = RatingsSimulator::default();
        let mut wins = 0;
        for seed in 0..200 {
            let game = sim.simulate(&input(team(0, 75), team(1, 35)), &mut ChaCha8Rng::seed_from_u64(seed)).game;
            if game.winner() == 0 {
                wins += 1;
            }
        }
        assert!(wins > 150, "strong team won {} of 200", wins);
    }

    #[test]
    fn test_injured_players_sit() {
        let sim = RatingsSimulator::default();
        let mut home = team(0, 50);
        home.players[0].injured = true;
        let game = sim.simulate(&input(home, team(1, 50)), &mut ChaCha8Rng::seed_from_u64(1)).game;
        assert!(game.teams[0].players.iter().all(|p| p.pid != 0));
    }
}
