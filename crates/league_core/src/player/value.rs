//! Player value: a single number combining current ability, potential and age.
//!
//! `value` blends ovr with pot for young players, `value_no_pot` ignores pot,
//! and `value_fuzz` is `value` computed from fuzzed ratings, which is what AI
//! teams and draft rankings see.

use super::fuzz_rating;
use crate::models::Player;

/// Weight given to potential at a given age.
fn pot_weight(age: u8) -> f64 {
    match age {
        0..=19 => 0.7,
        20 => 0.6,
        21 => 0.5,
        22 => 0.4,
        23 => 0.3,
        24 => 0.2,
        25..=28 => 0.1,
        _ => 0.0,
    }
}

/// Penalty for players past their prime; contracts for them are riskier.
fn age_factor(age: u8) -> f64 {
    if age <= 30 {
        1.0
    } else {
        (1.0 - 0.03 * (age - 30) as f64).max(0.5)
    }
}

fn blend(ovr: f64, pot: f64, age: u8, with_pot: bool) -> f64 {
    let w = if with_pot { pot_weight(age) } else { 0.0 };
    ((1.0 - w) * ovr + w * pot) * age_factor(age)
}

/// Recomputes `value`, `value_no_pot` and `value_fuzz` from the latest rating.
pub fn update_values(player: &mut Player, season: u16) {
    let age = player.age(season);
    let Some(r) = player.latest_rating() else {
        player.value = 0.0;
        player.value_no_pot = 0.0;
        player.value_fuzz = 0.0;
        return;
    };
    let (ovr, pot) = (r.ovr as f64, r.pot as f64);
    let (fuzzed_ovr, fuzzed_pot) = (fuzz_rating(r.ovr, r.fuzz) as f64, fuzz_rating(r.pot, r.fuzz) as f64);

    player.value = blend(ovr, pot, age, true);
    player.value_no_pot = blend(ovr, pot, age, false);
    player.value_fuzz = blend(fuzzed_ovr, fuzzed_pot, age, true);
}
