//! Aging and retirement.
//!
//! The statistical model is pluggable: the phase machine only talks to a
//! [`DevelopmentModel`]. [`DefaultDevelopment`] is a simple age curve:
//! - under 22: strong growth
//! - 22-27: growth tapering to zero
//! - 28+: decline, faster for athletic ratings

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::ovr;
use crate::models::{Player, RatingSnapshot, Skill};

pub trait DevelopmentModel: Send + Sync {
    /// Applies one year of development to `ratings` for a player who is now
    /// `age`. Derived fields are refreshed by the caller.
    fn develop(&self, ratings: &mut RatingSnapshot, age: u8, rng: &mut ChaCha8Rng);

    /// Whether the player retires before `season` starts.
    fn should_retire(&self, player: &Player, season: u16, rng: &mut ChaCha8Rng) -> bool;
}

#[derive(Debug, Clone)]
pub struct DefaultDevelopment {
    /// Standard deviation of the yearly per-rating change.
    pub noise: f64,
    /// Age from which players under contract may retire.
    pub contract_retirement_age: u8,
}

impl Default for DefaultDevelopment {
    fn default() -> Self {
        Self { noise: 2.0, contract_retirement_age: 35 }
    }
}

impl DefaultDevelopment {
    /// Expected yearly change of a non-athletic rating.
    pub fn base_change(age: u8) -> f64 {
        match age {
            0..=20 => 4.0,
            21 => 3.0,
            22..=23 => 2.0,
            24..=25 => 1.0,
            26..=27 => 0.0,
            28..=30 => -1.0,
            31..=33 => -2.0,
            _ => -3.0,
        }
    }

    /// Extra change for athletic ratings, which peak earlier.
    pub fn athletic_modifier(age: u8) -> f64 {
        match age {
            0..=23 => 1.0,
            24..=26 => 0.0,
            27..=29 => -1.0,
            _ => -2.0,
        }
    }

    /// Yearly retirement probability.
    pub fn retirement_probability(&self, player: &Player, season: u16) -> f64 {
        let age = player.age(season);
        if player.tid.is_team() {
            if age < self.contract_retirement_age {
                return 0.0;
            }
            return (0.25 * (age - self.contract_retirement_age + 1) as f64).min(1.0);
        }
        if age < 24 {
            return 0.0;
        }
        let age_term = 0.1 * age.saturating_sub(27) as f64;
        let value_term = ((45.0 - player.value) / 30.0).max(0.0);
        (age_term + value_term).clamp(0.0, 1.0)
    }
}

impl DevelopmentModel for DefaultDevelopment {
    fn develop(&self, ratings: &mut RatingSnapshot, age: u8, rng: &mut ChaCha8Rng) {
        let normal = Some(self.noise).filter(|sd| sd.is_finite() && *sd > 0.0).and_then(|sd| Normal::new(0.0, sd).ok());
        let base = Self::base_change(age);
        for skill in Skill::ALL {
            // Height only moves a little while the player is still growing.
            if skill == Skill::Hgt {
                if age <= 20 && rng.gen_bool(0.3) {
                    ratings.set(skill, ratings.get(skill).saturating_add(1));
                }
                continue;
            }
            let mut change = base + normal.map_or(0.0, |n| n.sample(rng));
            if skill.is_athletic() {
                change += Self::athletic_modifier(age);
            }
            let value = (ratings.get(skill) as f64 + change).round().clamp(0.0, 100.0);
            ratings.set(skill, value as u8);
        }
    }

    fn should_retire(&self, player: &Player, season: u16, rng: &mut ChaCha8Rng) -> bool {
        let p = self.retirement_probability(player, season);
        p > 0.0 && rng.gen_bool(p)
    }
}

/// Appends the snapshot for `season`: previous ratings developed one year,
/// with a freshly sampled fuzz. No-op when the season already has one.
pub fn develop_player(
    model: &dyn DevelopmentModel,
    player: &mut Player,
    season: u16,
    fuzz: f64,
    rng: &mut ChaCha8Rng,
) {
    if player.rating(season).is_some() {
        return;
    }
    let Some(prev) = player.latest_rating() else {
        return;
    };
    let age = player.age(season);
    let mut next = prev.clone();
    next.season = season;
    next.fuzz = fuzz;
    model.develop(&mut next, age, rng);
    ovr::refresh(&mut next, age);
    player.pos = next.pos.clone();
    player.ratings.push(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Owner;
    use crate::testutil::sample_player;
    use rand::SeedableRng;

    #[test]
    fn test_age_curve() {
        assert!(DefaultDevelopment::base_change(19) > DefaultDevelopment::base_change(25));
        assert!(DefaultDevelopment::base_change(34) < 0.0);
        assert!(DefaultDevelopment::athletic_modifier(32) < DefaultDevelopment::athletic_modifier(22));
    }

    #[test]
    fn test_develop_player_appends_one_snapshot() {
        let model = DefaultDevelopment::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut p = sample_player(1, Owner::Team(0));
        let season = p.latest_rating().unwrap().season + 1;

        develop_player(&model, &mut p, season, 1.5, &mut rng);
        develop_player(&model, &mut p, season, -2.0, &mut rng);

        assert_eq!(p.ratings.len(), 2);
        let latest = p.latest_rating().unwrap();
        assert_eq!(latest.season, season);
        assert_eq!(latest.fuzz, 1.5);
    }

    #[test]
    fn test_young_players_improve_on_average() {
        let model = DefaultDevelopment { noise: 0.0, ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut r = sample_player(1, Owner::Team(0)).latest_rating().unwrap().clone();
        let before = r.oiq;
        model.develop(&mut r, 19, &mut rng);
        assert_eq!(r.oiq, before + 4);
    }

    #[test]
    fn test_retirement_rules() {
        let model = DefaultDevelopment::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let mut veteran = sample_player(1, Owner::Team(0));
        veteran.born.year = 1995;
        assert_eq!(model.retirement_probability(&veteran, 2025), 0.0);
        assert!(!model.should_retire(&veteran, 2025, &mut rng));

        veteran.born.year = 1980;
        assert_eq!(model.retirement_probability(&veteran, 2025), 1.0);

        let mut young_fa = sample_player(2, Owner::FreeAgent);
        young_fa.born.year = 2004;
        young_fa.value = 20.0;
        assert_eq!(model.retirement_probability(&young_fa, 2025), 0.0);

        let mut old_fa = sample_player(3, Owner::FreeAgent);
        old_fa.born.year = 1988;
        assert!(model.should_retire(&old_fa, 2025, &mut rng));
    }
}
