//! Fixtures shared by unit tests.

use crate::config::LeagueSettings;
use crate::creation::{create_league, NewLeague};
use crate::models::*;
use crate::player::{ovr, update_values};
use crate::state::LeagueState;

pub const SEASON: u16 = 2025;

/// A 25-year-old with middling ratings, under contract through next season.
pub fn sample_player(pid: u32, owner: Owner) -> Player {
    let mut ratings = RatingSnapshot { season: SEASON, fuzz: 0.0, ..Default::default() };
    for (i, skill) in Skill::ALL.into_iter().enumerate() {
        ratings.set(skill, 45 + ((pid as usize + i) % 10) as u8);
    }
    ovr::refresh(&mut ratings, 25);
    let mut player = Player {
        pid,
        tid: owner,
        name: format!("Player {}", pid),
        pos: ratings.pos.clone(),
        born: Born { year: SEASON - 25, loc: "Nowhere".to_string() },
        ratings: vec![ratings],
        contract: Contract { amount: 1_000, exp: SEASON + 1, rookie: false },
        contract_desired: None,
        draft: DraftInfo { year: SEASON - 6, ..Default::default() },
        injury: Injury::healthy(),
        value: 0.0,
        value_no_pot: 0.0,
        value_fuzz: 0.0,
        years_free_agent: 0,
        retired_year: None,
        last_tid: owner.team(),
        watch: false,
    };
    update_values(&mut player, SEASON);
    player
}

pub fn sample_team(tid: u32) -> Team {
    Team {
        tid,
        cid: (tid % 2) as u8,
        did: (tid % 2) as u8,
        region: format!("Region {}", tid),
        name: format!("Team {}", tid),
        abbrev: format!("T{}", tid),
        pop: 2.0,
        seasons: vec![TeamSeason::new(SEASON, 0.5, 2.0)],
        stats: Vec::new(),
    }
}

/// Four teams, six games, one playoff round.
pub fn small_settings() -> LeagueSettings {
    LeagueSettings {
        num_teams: 4,
        num_games: 6,
        num_games_playoff_series: vec![3],
        min_roster: 5,
        max_roster: 7,
        draft_rounds: 2,
        draft_class_size: 10,
        ..LeagueSettings::default()
    }
}

/// A freshly created small league in the preseason.
pub fn sample_state() -> LeagueState {
    create_league(&NewLeague {
        lid: 0,
        name: "Test League".to_string(),
        season: SEASON,
        user_tid: 0,
        seed: 1234,
        settings: small_settings(),
    })
    .expect("sample league")
}

/// Brings the user's roster within limits the way a player would.
pub fn fix_user_roster(state: &mut LeagueState) {
    use crate::market::{release_player, sign_player};

    let tid = state.ctx.user_tid;
    let (min, max) = (state.ctx.settings.min_roster, state.ctx.settings.max_roster);
    while state.roster_size(tid) > max {
        let worst = state
            .roster(tid)
            .into_iter()
            .min_by(|a, b| a.value.total_cmp(&b.value).then(a.pid.cmp(&b.pid)))
            .map(|p| p.pid)
            .unwrap();
        release_player(state, worst).unwrap();
    }
    while state.roster_size(tid) < min {
        let pid = state.free_agents()[0].pid;
        let contract = Contract { amount: state.ctx.settings.min_contract, exp: state.ctx.season + 1, rookie: false };
        sign_player(state, pid, tid, contract).unwrap();
    }
}

/// A small league that has started its regular season.
pub fn regular_season_state() -> LeagueState {
    let mut state = sample_state();
    fix_user_roster(&mut state);
    crate::phase::advance(&mut state, Phase::RegularSeason, &crate::player::DefaultDevelopment::default())
        .expect("regular season");
    state
}
