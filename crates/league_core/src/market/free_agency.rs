//! AI free agency: asks, signings, roster fixing and re-signing.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use super::mood::{amount_with_mood, mood};
use super::negotiation::{first_contract_season, make_free_agent, release_player, sign_player};
use crate::error::Result;
use crate::models::{Contract, Negotiation, Owner, Player, Team};
use crate::player::{base_amount, gen_contract, gen_player};
use crate::state::LeagueState;

/// Fraction of the ask a free agent keeps each time asks decay.
const ASK_DECAY: f64 = 0.9;

/// AI teams keep expiring players at or above this value.
const RESIGN_VALUE: f64 = 55.0;

/// Free agents sorted best first: value descending, pid ascending.
fn free_agents_by_value(state: &LeagueState) -> Vec<(u32, f64)> {
    let mut fas: Vec<(u32, f64)> = state.free_agents().iter().map(|p| (p.pid, p.value)).collect();
    fas.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    fas
}

/// Recomputes every free agent's ask against the user's team, starting
/// `first_contract_season`.
pub fn refresh_asks(state: &mut LeagueState, rng: &mut ChaCha8Rng) -> Result<()> {
    let settings = state.ctx.settings.clone();
    let season = state.ctx.season;
    let start = first_contract_season(state);
    let user_team: Option<Team> = state.store.get::<Team>(&state.ctx.user_tid).cloned();

    let pids: Vec<u32> = state.free_agents().iter().map(|p| p.pid).collect();
    for pid in pids {
        let Some(p) = state.store.get::<Player>(&pid) else { continue };
        let base = base_amount(p, &settings);
        let amount = match &user_team {
            Some(team) => amount_with_mood(base, mood(p, team, season), &settings),
            None => base,
        };
        let exp = gen_contract(p, &settings, start.saturating_sub(1), rng).exp;
        let ask = Contract { amount, exp, rookie: false };
        state.store.update::<Player>(&pid, |p| {
            p.contract = ask;
            p.contract_desired = Some(ask);
        });
    }
    Ok(())
}

/// Lowers unsigned free agents' asks. Run once per new season.
pub fn decay_asks(state: &mut LeagueState) {
    let settings = state.ctx.settings.clone();
    let season = state.ctx.season;
    let pids: Vec<u32> = state.free_agents().iter().map(|p| p.pid).collect();
    for pid in pids {
        state.store.update::<Player>(&pid, |p| {
            p.years_free_agent = p.years_free_agent.saturating_add(1);
            if let Some(ask) = p.contract_desired.as_mut() {
                let amount = crate::player::round_amount(ask.amount as f64 * ASK_DECAY);
                ask.amount = amount.clamp(settings.min_contract, settings.max_contract);
                ask.exp = ask.exp.max(season + 1);
                p.contract = *ask;
            }
        });
    }
}

/// Ask of a free agent from the point of view of an AI team.
fn ai_ask(p: &Player, state: &LeagueState) -> u32 {
    p.contract_desired.map_or_else(|| base_amount(p, &state.ctx.settings), |c| c.amount)
}

fn ai_contract(p: &Player, state: &LeagueState, rng: &mut ChaCha8Rng) -> Contract {
    let start = first_contract_season(state);
    let exp = match p.contract_desired {
        Some(c) if c.exp >= start => c.exp,
        _ => gen_contract(p, &state.ctx.settings, start.saturating_sub(1), rng).exp,
    };
    Contract { amount: ai_ask(p, state), exp, rookie: false }
}

/// Adds a replacement-level free agent so rosters can always be filled.
fn add_generated_free_agent(state: &mut LeagueState, rng: &mut ChaCha8Rng) -> u32 {
    let settings = state.ctx.settings.clone();
    let season = state.ctx.season;
    let pid = state.store.next_id::<Player>();
    let age: u8 = rng.gen_range(24..=31);
    let mut p = gen_player(rng, pid, Owner::FreeAgent, age, season, season + 20 - age as u16, 35.0, &settings);
    let ask = Contract { amount: settings.min_contract, exp: first_contract_season(state) + 1, rookie: false };
    p.contract = ask;
    p.contract_desired = Some(ask);
    state.store.put(p);
    pid
}

/// AI teams sign free agents in rounds, one signing per team per round, in
/// an order shuffled by `rng`. A team signs when it has roster room and
/// either needs players or can afford the best remaining free agent; teams
/// under the minimum take minimum deals over the cap. Returns the number of
/// signings.
pub fn auto_sign(state: &mut LeagueState, rng: &mut ChaCha8Rng) -> Result<usize> {
    let min_roster = state.ctx.settings.min_roster;
    let max_roster = state.ctx.settings.max_roster;
    let min_contract = state.ctx.settings.min_contract;
    let mut order = state.ai_team_ids();
    order.shuffle(rng);

    let mut signed = 0;
    loop {
        let mut progressed = false;
        for &tid in &order {
            let size = state.roster_size(tid);
            if size >= max_roster {
                continue;
            }
            let needs_players = size < min_roster;
            let cap_space = state.cap_space(tid);

            let in_negotiation = |pid: u32, s: &LeagueState| s.store.get::<Negotiation>(&pid).is_some();
            let pick = free_agents_by_value(state).into_iter().map(|(pid, _)| pid).find(|&pid| {
                if in_negotiation(pid, state) {
                    return false;
                }
                state.store.get::<Player>(&pid).map_or(false, |p| {
                    let ask = ai_ask(p, state);
                    ask as i64 <= cap_space || (needs_players && ask <= min_contract)
                })
            });

            let (pid, contract) = match pick {
                Some(pid) => {
                    let Some(p) = state.store.get::<Player>(&pid) else { continue };
                    (pid, ai_contract(p, state, rng))
                }
                None if needs_players => {
                    // Nobody affordable: a minimum deal for the best
                    // remaining player, or a generated one.
                    let best = free_agents_by_value(state)
                        .into_iter()
                        .map(|(pid, _)| pid)
                        .find(|&pid| !in_negotiation(pid, state));
                    let pid = match best {
                        Some(pid) => pid,
                        None => add_generated_free_agent(state, rng),
                    };
                    let Some(p) = state.store.get::<Player>(&pid) else { continue };
                    let mut contract = ai_contract(p, state, rng);
                    contract.amount = min_contract;
                    (pid, contract)
                }
                None => continue,
            };

            sign_player(state, pid, tid, contract)?;
            signed += 1;
            progressed = true;
        }
        if !progressed {
            break;
        }
    }
    if signed > 0 {
        info!(signed, "AI teams signed free agents");
    }
    Ok(signed)
}

/// Brings every AI roster within limits: releases the lowest-value players
/// over the maximum and signs players up to the minimum.
pub fn fix_ai_rosters(state: &mut LeagueState, rng: &mut ChaCha8Rng) -> Result<()> {
    let max_roster = state.ctx.settings.max_roster;
    for tid in state.ai_team_ids() {
        while state.roster_size(tid) > max_roster {
            let worst = state
                .roster(tid)
                .into_iter()
                .min_by(|a, b| a.value.total_cmp(&b.value).then(b.pid.cmp(&a.pid)))
                .map(|p| p.pid);
            let Some(pid) = worst else { break };
            debug!(tid, pid, "releasing to get under the roster limit");
            release_player(state, pid)?;
        }
    }
    auto_sign(state, rng)?;
    Ok(())
}

/// Players on `tid` whose contract ends this season.
pub fn expiring_contracts(state: &LeagueState, tid: u32) -> Vec<u32> {
    let season = state.ctx.season;
    state.roster(tid).iter().filter(|p| p.contract.exp <= season).map(|p| p.pid).collect()
}

/// Opens a re-signing negotiation for each expiring user-team player.
pub fn open_resign_negotiations(state: &mut LeagueState) -> usize {
    let tid = state.ctx.user_tid;
    let pids = expiring_contracts(state, tid);
    for &pid in &pids {
        state.store.put(Negotiation { pid, tid, resigning: true });
    }
    pids.len()
}

/// AI teams keep valuable expiring players (or anyone needed to stay at the
/// roster minimum) and let the rest walk.
pub fn ai_resign(state: &mut LeagueState, rng: &mut ChaCha8Rng) -> Result<()> {
    let settings = state.ctx.settings.clone();
    let season = state.ctx.season;
    for tid in state.ai_team_ids() {
        let mut expiring: Vec<(u32, f64)> = expiring_contracts(state, tid)
            .into_iter()
            .filter_map(|pid| state.store.get::<Player>(&pid).map(|p| (pid, p.value)))
            .collect();
        expiring.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let staying = state.roster_size(tid) - expiring.len();
        for (i, (pid, value)) in expiring.into_iter().enumerate() {
            let needed = staying + i < settings.min_roster;
            if value >= RESIGN_VALUE || needed {
                let Some(p) = state.store.get::<Player>(&pid) else { continue };
                let contract = gen_contract(p, &settings, season, rng);
                sign_player(state, pid, tid, contract)?;
            } else {
                make_free_agent(state, pid)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RngStream;
    use crate::models::Phase;
    use crate::testutil::sample_state;

    #[test]
    fn test_auto_sign_fills_short_rosters() {
        let mut state = sample_state();
        let ai = state.ai_team_ids()[0];
        while state.roster_size(ai) > 2 {
            let pid = state.roster(ai)[0].pid;
            make_free_agent(&mut state, pid).unwrap();
        }
        let mut rng = state.ctx.rng(RngStream::FreeAgency);
        let signed = auto_sign(&mut state, &mut rng).unwrap();
        assert!(signed >= 3);
        assert!(state.roster_size(ai) >= state.ctx.settings.min_roster);
        for tid in state.store.team_ids() {
            assert!(state.roster_size(tid) <= state.ctx.settings.max_roster);
        }
    }

    #[test]
    fn test_auto_sign_generates_players_when_pool_empty() {
        let mut state = sample_state();
        for pid in state.free_agents().iter().map(|p| p.pid).collect::<Vec<_>>() {
            state.store.update::<Player>(&pid, |p| p.tid = Owner::Retired);
        }
        let ai = state.ai_team_ids()[0];
        while state.roster_size(ai) >= state.ctx.settings.min_roster {
            let pid = state.roster(ai)[0].pid;
            state.store.update::<Player>(&pid, |p| p.tid = Owner::Retired);
        }

        let mut rng = state.ctx.rng(RngStream::FreeAgency);
        auto_sign(&mut state, &mut rng).unwrap();
        assert_eq!(state.roster_size(ai), state.ctx.settings.min_roster);
    }

    #[test]
    fn test_auto_sign_is_deterministic() {
        let run = || {
            let mut state = sample_state();
            for tid in state.ai_team_ids() {
                let pid = state.roster(tid)[0].pid;
                make_free_agent(&mut state, pid).unwrap();
            }
            let mut rng = state.ctx.rng(RngStream::FreeAgency);
            auto_sign(&mut state, &mut rng).unwrap();
            state.store.get_all::<Player>().map(|p| (p.pid, p.tid)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_decay_lowers_asks() {
        let mut state = sample_state();
        let pid = state.free_agents()[0].pid;
        state.store.update::<Player>(&pid, |p| {
            p.contract_desired = Some(Contract { amount: 10_000, exp: 2026, rookie: false });
        });
        decay_asks(&mut state);
        let p = state.store.get::<Player>(&pid).unwrap();
        assert_eq!(p.contract_desired.unwrap().amount, 9_000);
        assert_eq!(p.years_free_agent, 1);
    }

    #[test]
    fn test_ai_resign_keeps_roster_minimum() {
        let mut state = sample_state();
        state.ctx.phase = Phase::ResignPlayers;
        let season = state.ctx.season;
        for tid in state.ai_team_ids() {
            for pid in state.roster(tid).iter().map(|p| p.pid).collect::<Vec<_>>() {
                state.store.update::<Player>(&pid, |p| p.contract.exp = season);
            }
        }
        let mut rng = state.ctx.rng(RngStream::FreeAgency);
        ai_resign(&mut state, &mut rng).unwrap();
        for tid in state.ai_team_ids() {
            assert!(state.roster_size(tid) >= state.ctx.settings.min_roster);
            assert!(state.roster(tid).iter().all(|p| p.contract.exp > season));
        }
    }

    #[test]
    fn test_user_resign_negotiations() {
        let mut state = sample_state();
        let season = state.ctx.season;
        let tid = state.ctx.user_tid;
        let pid = state.roster(tid)[0].pid;
        state.store.update::<Player>(&pid, |p| p.contract.exp = season);
        assert!(open_resign_negotiations(&mut state) >= 1);
        assert!(state.store.get::<Negotiation>(&pid).unwrap().resigning);
    }
}
