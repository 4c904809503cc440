//! Random player generation.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::{names, ovr, value};
use crate::config::LeagueSettings;
use crate::models::{Born, Contract, DraftInfo, Injury, Owner, Player, RatingSnapshot, Skill};

const FUZZ_SD: f64 = 3.0;
const FUZZ_LIMIT: f64 = 5.0;

/// Scouting fuzz for a new rating snapshot.
pub fn gen_fuzz<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let normal = Normal::new(0.0, FUZZ_SD).expect("valid fuzz distribution");
    normal.sample(rng).clamp(-FUZZ_LIMIT, FUZZ_LIMIT)
}

/// Per-rating offsets relative to the player's base talent, by archetype.
fn archetype_offsets(big: bool) -> [(Skill, f64); 15] {
    let sign = if big { 1.0 } else { -1.0 };
    [
        (Skill::Hgt, 12.0 * sign),
        (Skill::Stre, 5.0 * sign),
        (Skill::Spd, -6.0 * sign),
        (Skill::Jmp, 0.0),
        (Skill::Endu, 0.0),
        (Skill::Ins, 8.0 * sign),
        (Skill::Dnk, 6.0 * sign),
        (Skill::Ft, -3.0 * sign),
        (Skill::Fg, -2.0 * sign),
        (Skill::Tp, -8.0 * sign),
        (Skill::Oiq, 0.0),
        (Skill::Diq, 2.0 * sign),
        (Skill::Drb, -8.0 * sign),
        (Skill::Pss, -6.0 * sign),
        (Skill::Reb, 9.0 * sign),
    ]
}

/// Ratings for a player of `age` with base talent drawn around `mean`.
pub fn gen_ratings<R: Rng + ?Sized>(rng: &mut R, season: u16, age: u8, mean: f64) -> RatingSnapshot {
    let talent = Normal::new(mean, 7.0).expect("valid talent distribution").sample(rng);
    let spread = Normal::new(0.0, 6.0).expect("valid rating distribution");
    let big = rng.gen_bool(0.4);

    let mut r = RatingSnapshot { season, fuzz: gen_fuzz(rng), ..Default::default() };
    for (skill, offset) in archetype_offsets(big) {
        let value = (talent + offset + spread.sample(rng)).round().clamp(0.0, 100.0);
        r.set(skill, value as u8);
    }
    ovr::refresh(&mut r, age);
    r
}

/// A new player. Contract and draft fields are set by the caller when the
/// player joins a team; prospects get a placeholder minimum contract.
#[allow(clippy::too_many_arguments)]
pub fn gen_player<R: Rng + ?Sized>(
    rng: &mut R,
    pid: u32,
    owner: Owner,
    age: u8,
    season: u16,
    draft_year: u16,
    mean: f64,
    settings: &LeagueSettings,
) -> Player {
    let ratings = gen_ratings(rng, season, age, mean);
    let mut player = Player {
        pid,
        tid: owner,
        name: names::random_name(rng),
        pos: ratings.pos.clone(),
        born: Born { year: season - age as u16, loc: names::random_birthplace(rng) },
        ratings: vec![ratings],
        contract: Contract { amount: settings.min_contract, exp: season, rookie: false },
        contract_desired: None,
        draft: DraftInfo { year: draft_year, ..Default::default() },
        injury: Injury::healthy(),
        value: 0.0,
        value_no_pot: 0.0,
        value_fuzz: 0.0,
        years_free_agent: 0,
        retired_year: None,
        last_tid: owner.team(),
        watch: false,
    };
    value::update_values(&mut player, season);
    player
}

/// One draft class of `size` prospects for the draft held in `draft_year`.
pub fn gen_draft_class<R: Rng + ?Sized>(
    rng: &mut R,
    first_pid: u32,
    class: Owner,
    season: u16,
    draft_year: u16,
    size: usize,
    settings: &LeagueSettings,
) -> Vec<Player> {
    (0..size)
        .map(|i| {
            // Prospects are 19 in their draft year.
            let age = 19u16.saturating_sub(draft_year.saturating_sub(season)) as u8;
            let mean = rng.gen_range(30.0..42.0);
            gen_player(rng, first_pid + i as u32, class, age, season, draft_year, mean, settings)
        })
        .collect()
}
