use rand::Rng;

use crate::config::LeagueSettings;
use crate::models::{Contract, Player};

/// Rounds a contract amount (thousands) to the nearest multiple of 10.
pub fn round_amount(amount: f64) -> u32 {
    ((amount / 10.0).round() * 10.0).max(0.0) as u32
}

/// Market value of a player's next contract, before mood.
pub fn base_amount(player: &Player, settings: &LeagueSettings) -> u32 {
    let scaled = (player.value / 100.0 - 0.47) * 3.3 * settings.max_contract as f64;
    round_amount(scaled).clamp(settings.min_contract, settings.max_contract)
}

/// A fresh contract ask starting next season. Younger players ask for
/// longer deals.
pub fn gen_contract<R: Rng + ?Sized>(
    player: &Player,
    settings: &LeagueSettings,
    season: u16,
    rng: &mut R,
) -> Contract {
    let age = player.age(season);
    let max_years: u16 = match age {
        0..=25 => 5,
        26..=29 => 4,
        30..=32 => 3,
        _ => 2,
    };
    let years = rng.gen_range(1..=max_years);
    Contract { amount: base_amount(player, settings), exp: season + years, rookie: false }
}

/// Rookie-scale contract for the `overall`-th pick (0-based) of a draft held
/// in `season`.
pub fn rookie_contract(overall: usize, settings: &LeagueSettings, season: u16) -> Contract {
    let first_round = settings.num_teams as usize;
    let top = (settings.max_contract as f64 * 0.2).max(settings.min_contract as f64);
    let amount = if overall < first_round {
        let frac = overall as f64 / first_round as f64;
        top - frac * (top - settings.min_contract as f64)
    } else {
        settings.min_contract as f64
    };
    Contract {
        amount: round_amount(amount).clamp(settings.min_contract, settings.max_contract),
        exp: season + settings.rookie_contract_years,
        rookie: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Owner;
    use crate::testutil::sample_player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_base_amount_clamped() {
        let settings = LeagueSettings::default();
        let mut p = sample_player(1, Owner::FreeAgent);
        p.value = 10.0;
        assert_eq!(base_amount(&p, &settings), settings.min_contract);
        p.value = 99.0;
        assert_eq!(base_amount(&p, &settings), settings.max_contract);
        p.value = 60.0;
        let mid = base_amount(&p, &settings);
        assert!(mid > settings.min_contract && mid < settings.max_contract);
        assert_eq!(mid % 10, 0);
    }

    #[test]
    fn test_rookie_scale_descends() {
        let settings = LeagueSettings::default();
        let first = rookie_contract(0, &settings, 2025);
        let tenth = rookie_contract(9, &settings, 2025);
        let second_round = rookie_contract(40, &settings, 2025);
        assert!(first.amount > tenth.amount);
        assert_eq!(second_round.amount, settings.min_contract);
        assert!(first.rookie);
        assert_eq!(first.exp, 2025 + settings.rookie_contract_years);
    }

    #[test]
    fn test_gen_contract_years() {
        let settings = LeagueSettings::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut p = sample_player(1, Owner::FreeAgent);
        p.born.year = 1990;
        for _ in 0..20 {
            let c = gen_contract(&p, &settings, 2025, &mut rng);
            assert!(c.exp > 2025 && c.exp <= 2027);
        }
    }
}
