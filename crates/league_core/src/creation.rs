//! New league creation.

use rand::Rng;
use tracing::info;

use crate::config::LeagueSettings;
use crate::context::{LeagueContext, RngStream};
use crate::error::{LeagueError, Result};
use crate::models::*;
use crate::player::{gen_contract, gen_draft_class, gen_player};
use crate::state::LeagueState;
use crate::store::EntityStore;

const TEAMS: &[(&str, &str, &str, f64)] = &[
    ("Atlanta", "Gold Club", "ATL", 5.3),
    ("Baltimore", "Crabs", "BAL", 2.8),
    ("Boston", "Massacre", "BOS", 7.3),
    ("Chicago", "Whirlwinds", "CHI", 9.1),
    ("Cincinnati", "Riots", "CIN", 1.7),
    ("Cleveland", "Curses", "CLE", 2.1),
    ("Dallas", "Snipers", "DAL", 6.4),
    ("Denver", "High", "DEN", 2.7),
    ("Detroit", "Muscle", "DET", 4.4),
    ("Houston", "Apollos", "HOU", 6.0),
    ("Kansas City", "Sauce", "KC", 1.9),
    ("Las Vegas", "Blue Chips", "LV", 1.9),
    ("Los Angeles", "Earthquakes", "LA", 15.6),
    ("Memphis", "Blues", "MEM", 1.3),
    ("Miami", "Cyclones", "MIA", 5.5),
    ("Milwaukee", "Cheesemakers", "MIL", 1.6),
    ("Minneapolis", "Freeze", "MIN", 3.2),
    ("Montreal", "Mounties", "MON", 4.1),
    ("New York", "Bankers", "NYC", 20.2),
    ("Oklahoma City", "Tornados", "OKC", 1.3),
    ("Orlando", "Juice", "ORL", 2.2),
    ("Philadelphia", "Cheesesteaks", "PHI", 6.1),
    ("Phoenix", "Vultures", "PHO", 4.4),
    ("Pittsburgh", "Rivers", "PIT", 1.7),
    ("Portland", "Roses", "POR", 2.2),
    ("Sacramento", "Gold Rush", "SAC", 2.2),
    ("San Antonio", "Churros", "SA", 2.3),
    ("San Diego", "Pandas", "SD", 2.9),
    ("Seattle", "Symphony", "SEA", 3.7),
    ("Toronto", "Ravens", "TOR", 6.3),
];

#[derive(Debug, Clone)]
pub struct NewLeague {
    pub lid: u32,
    pub name: String,
    pub season: u16,
    pub user_tid: u32,
    pub seed: u64,
    pub settings: LeagueSettings,
}

fn gen_teams(settings: &LeagueSettings, season: u16) -> Vec<Team> {
    let n = settings.num_teams as usize;
    (0..n)
        .map(|i| {
            let (region, name, abbrev, pop) = TEAMS[i % TEAMS.len()];
            // Past the list, reuse names with a numeric suffix.
            let cycle = i / TEAMS.len();
            let abbrev = if cycle == 0 { abbrev.to_string() } else { format!("{}{}", abbrev, cycle + 1) };
            Team {
                tid: i as u32,
                cid: (i * 2 / n) as u8,
                did: (i * 6 / n) as u8,
                region: region.to_string(),
                name: name.to_string(),
                abbrev,
                pop,
                seasons: vec![TeamSeason::new(season, 0.5, pop)],
                stats: Vec::new(),
            }
        })
        .collect()
}

/// Builds a league in the preseason of `opts.season`: teams with full
/// rosters, a free-agent pool, three future draft classes and tradeable picks.
pub fn create_league(opts: &NewLeague) -> Result<LeagueState> {
    opts.settings.validate()?;
    let settings = &opts.settings;
    let season = opts.season;

    let ctx = LeagueContext::new(opts.lid, opts.name.clone(), season, opts.user_tid, opts.seed)
        .with_settings(settings.clone());
    if opts.user_tid >= settings.num_teams {
        return Err(LeagueError::InvalidSettings(format!(
            "user team {} does not exist",
            opts.user_tid
        )));
    }
    let mut rng = ctx.rng(RngStream::Creation);
    let mut store = EntityStore::new();

    for team in gen_teams(settings, season) {
        store.put(team);
    }

    // Rosters, one player above the minimum so teams can absorb an injury.
    let roster_size = (settings.min_roster + 1).min(settings.max_roster);
    for tid in store.team_ids() {
        for _ in 0..roster_size {
            let pid = store.next_id::<Player>();
            let age: u8 = rng.gen_range(20..=33);
            let mean = rng.gen_range(40.0..54.0);
            let mut p = gen_player(&mut rng, pid, Owner::Team(tid), age, season, season + 20 - age as u16, mean, settings);
            // Signed last off-season.
            p.contract = gen_contract(&p, settings, season - 1, &mut rng);
            store.put(p);
        }
    }

    let free_agents = settings.num_teams as usize / 2 + 5;
    for _ in 0..free_agents {
        let pid = store.next_id::<Player>();
        let age: u8 = rng.gen_range(21..=34);
        let mean = rng.gen_range(36.0..48.0);
        let mut p = gen_player(&mut rng, pid, Owner::FreeAgent, age, season, season + 20 - age as u16, mean, settings);
        let ask = gen_contract(&p, settings, season, &mut rng);
        p.contract = ask;
        p.contract_desired = Some(ask);
        store.put(p);
    }

    for (offset, class) in Owner::draft_classes().into_iter().enumerate() {
        let first_pid = store.next_id::<Player>();
        let prospects = gen_draft_class(
            &mut rng,
            first_pid,
            class,
            season,
            season + offset as u16,
            settings.draft_class_size,
            settings,
        );
        for p in prospects {
            store.put(p);
        }
    }

    for pick_season in season..season + settings.future_pick_seasons {
        for round in 1..=settings.draft_rounds {
            for tid in store.team_ids() {
                let dpid = store.next_id::<DraftPick>();
                store.put(DraftPick { dpid, season: pick_season, round, tid, original_tid: tid });
            }
        }
    }

    let other = store.team_ids().into_iter().find(|&t| t != opts.user_tid).unwrap_or(opts.user_tid);
    store.put(TradeProposal {
        rid: 0,
        teams: [
            TradeSide { tid: opts.user_tid, ..Default::default() },
            TradeSide { tid: other, ..Default::default() },
        ],
    });

    let mut state = LeagueState::new(ctx, store);
    state.sync_game_attributes()?;
    state.store.add_message(
        season,
        Phase::Preseason,
        "The Owner",
        "Welcome to your new team. Win games and keep the books balanced.".to_string(),
    );
    state.store.check_integrity()?;

    info!(
        lid = state.ctx.lid,
        teams = settings.num_teams,
        players = state.store.count::<Player>(),
        "Created league {}",
        state.ctx.name
    );
    Ok(state)
}
