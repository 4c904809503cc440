//! Player mood toward a team and the mood-adjusted contract ask.

use crate::config::LeagueSettings;
use crate::models::{Player, Team};
use crate::player::round_amount;

/// Below this mood a player refuses to negotiate.
pub const REFUSE_MOOD: f64 = -2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodComponents {
    pub winning: f64,
    pub hype: f64,
    pub loyalty: f64,
}

impl MoodComponents {
    pub fn total(&self) -> f64 {
        self.winning + self.hype + self.loyalty
    }
}

/// Affinity of `player` toward `team` in `season`. Roughly in [-3, 3].
pub fn mood_components(player: &Player, team: &Team, season: u16) -> MoodComponents {
    // Early in a season the previous record says more than a handful of games.
    let row = team
        .season(season)
        .filter(|s| s.games() >= 10)
        .or_else(|| team.season(season.saturating_sub(1)))
        .or_else(|| team.seasons.last());
    let (winp, hype) = row.map_or((0.5, 0.5), |s| (if s.games() == 0 { 0.5 } else { s.winp() }, s.hype));
    MoodComponents {
        winning: (winp - 0.5) * 4.0,
        hype: (hype - 0.5) * 2.0,
        loyalty: if player.last_tid == Some(team.tid) { 1.0 } else { 0.0 },
    }
}

pub fn mood(player: &Player, team: &Team, season: u16) -> f64 {
    mood_components(player, team, season).total()
}

pub fn willing_to_negotiate(mood: f64) -> bool {
    mood >= REFUSE_MOOD
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Mood-adjusted ask. A happy player discounts up to 25%, an unhappy one
/// asks up to 25% more; the result is a multiple of 10 in
/// `[min_contract, max_contract]`. Never increases with mood.
pub fn amount_with_mood(base: u32, mood: f64, settings: &LeagueSettings) -> u32 {
    let mood = if mood.is_nan() { 0.0 } else { mood };
    let factor = 1.25 - 0.5 * logistic(mood);
    round_amount(base as f64 * factor).clamp(settings.min_contract, settings.max_contract)
}
