//! Contract negotiations, signings and releases.

use tracing::{debug, info};

use super::mood::{amount_with_mood, mood, willing_to_negotiate};
use crate::error::{LeagueError, Result};
use crate::models::{Contract, EventKind, Negotiation, Owner, Phase, Player, ReleasedPlayer, Team};
use crate::player::base_amount;
use crate::state::LeagueState;

pub const MAX_CONTRACT_YEARS: u16 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum OfferResponse {
    Accepted(Contract),
    Rejected { ask: u32 },
}

fn player(state: &LeagueState, pid: u32) -> Result<&Player> {
    state.store.get::<Player>(&pid).ok_or_else(|| LeagueError::NotFound(format!("player {}", pid)))
}

fn team(state: &LeagueState, tid: u32) -> Result<&Team> {
    state.store.get::<Team>(&tid).ok_or_else(|| LeagueError::NotFound(format!("team {}", tid)))
}

/// First season a newly signed contract may expire in. Off-season deals
/// start next season.
pub fn first_contract_season(state: &LeagueState) -> u16 {
    if state.ctx.phase >= Phase::Playoffs {
        state.ctx.season + 1
    } else {
        state.ctx.season
    }
}

/// What `pid` asks from `tid` right now, mood included.
pub fn asking_amount(state: &LeagueState, pid: u32, tid: u32) -> Result<u32> {
    let p = player(state, pid)?;
    let t = team(state, tid)?;
    let settings = &state.ctx.settings;
    let base = match (p.tid, p.contract_desired) {
        (Owner::FreeAgent, Some(desired)) => desired.amount,
        _ => base_amount(p, settings),
    };
    Ok(amount_with_mood(base, mood(p, t, state.ctx.season), settings))
}

pub fn start_negotiation(state: &mut LeagueState, pid: u32, tid: u32, resigning: bool) -> Result<()> {
    let phase = state.ctx.phase;
    if phase.is_drafting() {
        return Err(LeagueError::Negotiation("no negotiations during the draft".into()));
    }
    let p = player(state, pid)?;
    let t = team(state, tid)?;

    if resigning {
        if phase != Phase::ResignPlayers {
            return Err(LeagueError::Negotiation("re-signing only happens after the draft".into()));
        }
        if p.tid != Owner::Team(tid) || p.contract.exp > state.ctx.season {
            return Err(LeagueError::Negotiation(format!(
                "{} does not have an expiring contract with {}",
                p.name, t.abbrev
            )));
        }
    } else {
        if p.tid != Owner::FreeAgent {
            return Err(LeagueError::Negotiation(format!("{} is not a free agent", p.name)));
        }
        check_roster_room(state, tid)?;
        let m = mood(p, t, state.ctx.season);
        if !willing_to_negotiate(m) {
            return Err(LeagueError::Negotiation(format!("{} refuses to negotiate with you", p.name)));
        }
    }

    debug!(pid, tid, resigning, "negotiation started");
    state.store.put(Negotiation { pid, tid, resigning });
    Ok(())
}

fn check_roster_room(state: &LeagueState, tid: u32) -> Result<()> {
    let max = state.ctx.settings.max_roster;
    if state.roster_size(tid) >= max {
        return Err(LeagueError::Negotiation(format!("roster is full ({} players)", max)));
    }
    Ok(())
}

/// Offers `amount` through season `exp`. An accepted offer signs the player.
pub fn make_offer(state: &mut LeagueState, pid: u32, amount: u32, exp: u16) -> Result<OfferResponse> {
    let negotiation = state
        .store
        .get::<Negotiation>(&pid)
        .cloned()
        .ok_or_else(|| LeagueError::NotFound(format!("negotiation with player {}", pid)))?;
    let settings = state.ctx.settings.clone();
    if state.ctx.phase.is_drafting() {
        return Err(LeagueError::Negotiation("no negotiations during the draft".into()));
    }

    // The player may have moved since the negotiation opened.
    let p = player(state, pid)?;
    let expected = if negotiation.resigning { Owner::Team(negotiation.tid) } else { Owner::FreeAgent };
    if p.tid != expected {
        return Err(LeagueError::Negotiation(format!("{} is no longer available", p.name)));
    }
    if !negotiation.resigning {
        check_roster_room(state, negotiation.tid)?;
    }

    let first = first_contract_season(state);
    if exp < first || exp >= first + MAX_CONTRACT_YEARS {
        return Err(LeagueError::Negotiation(format!(
            "contract must expire between {} and {}",
            first,
            first + MAX_CONTRACT_YEARS - 1
        )));
    }
    if amount < settings.min_contract || amount > settings.max_contract {
        return Err(LeagueError::Negotiation(format!(
            "amount must be between {} and {}",
            settings.min_contract, settings.max_contract
        )));
    }

    // Re-signing own players and minimum deals are allowed over the cap.
    let payroll = state.payroll(negotiation.tid);
    let current = if negotiation.resigning { player(state, pid)?.contract.amount } else { 0 };
    let over_cap = payroll - current + amount > settings.salary_cap;
    if over_cap && !negotiation.resigning && amount > settings.min_contract {
        return Err(LeagueError::Negotiation(format!(
            "this contract would put you over the salary cap ({} + {} > {})",
            payroll, amount, settings.salary_cap
        )));
    }

    let ask = asking_amount(state, pid, negotiation.tid)?;
    if amount < ask {
        return Ok(OfferResponse::Rejected { ask });
    }

    let contract = Contract { amount, exp, rookie: false };
    sign_player(state, pid, negotiation.tid, contract)?;
    Ok(OfferResponse::Accepted(contract))
}

/// Ends a negotiation. Walking away from a re-signing sends the player to
/// free agency.
pub fn cancel_negotiation(state: &mut LeagueState, pid: u32) -> Result<()> {
    let Some(negotiation) = state.store.delete::<Negotiation>(&pid) else {
        return Ok(());
    };
    if negotiation.resigning {
        make_free_agent(state, pid)?;
    }
    Ok(())
}

/// Puts `pid` on `tid` with `contract`, closing any negotiation. Callers
/// have already checked the contract and the roster.
pub(crate) fn sign_player(state: &mut LeagueState, pid: u32, tid: u32, contract: Contract) -> Result<()> {
    let p = player(state, pid)?;
    let resigning = p.tid == Owner::Team(tid);
    let text = format!(
        "{} {} {} for ${:.1}M/year through {}",
        team(state, tid)?.abbrev,
        if resigning { "re-signed" } else { "signed" },
        p.name,
        contract.amount as f64 / 1000.0,
        contract.exp
    );

    state.store.update::<Player>(&pid, |p| {
        p.tid = Owner::Team(tid);
        p.contract = contract;
        p.contract_desired = None;
        p.years_free_agent = 0;
        p.last_tid = Some(tid);
    });
    state.store.delete::<Negotiation>(&pid);
    let kind = if resigning { EventKind::ReSigned } else { EventKind::FreeAgent };
    info!(pid, tid, amount = contract.amount, exp = contract.exp, "{}", text);
    state.log_event(kind, text, vec![pid], vec![tid]);
    Ok(())
}

/// Releases a player to free agency. The team keeps paying the remaining
/// contract unless it was never guaranteed (drafted this season).
pub fn release_player(state: &mut LeagueState, pid: u32) -> Result<()> {
    let p = player(state, pid)?;
    let Owner::Team(tid) = p.tid else {
        return Err(LeagueError::Negotiation(format!("{} is not on a team", p.name)));
    };
    let contract = p.contract;
    let just_drafted = p.draft.year == state.ctx.season && p.contract.rookie;
    let text = format!("{} released {}", team(state, tid)?.abbrev, p.name);

    if !just_drafted && contract.exp >= state.ctx.season {
        let rpid = state.store.next_id::<ReleasedPlayer>();
        state.store.put(ReleasedPlayer { rpid, pid, tid, contract });
    }
    make_free_agent(state, pid)?;
    info!(pid, tid, "{}", text);
    state.log_event(EventKind::Release, text, vec![pid], vec![tid]);
    Ok(())
}

/// Moves `pid` to the free-agent pool with a fresh ask.
pub fn make_free_agent(state: &mut LeagueState, pid: u32) -> Result<()> {
    let settings = state.ctx.settings.clone();
    let exp = first_contract_season(state) + 1;
    let p = player(state, pid)?;
    let ask = Contract { amount: base_amount(p, &settings), exp, rookie: false };
    state.store.update::<Player>(&pid, |p| {
        if let Owner::Team(tid) = p.tid {
            p.last_tid = Some(tid);
        }
        p.tid = Owner::FreeAgent;
        p.contract = ask;
        p.contract_desired = Some(ask);
    });
    state.store.delete::<Negotiation>(&pid);
    Ok(())
}

/// Drops released-player salary whose contract has run out.
pub fn expire_released_players(state: &mut LeagueState) {
    let season = state.ctx.season;
    let expired: Vec<u32> = state
        .store
        .get_all::<ReleasedPlayer>()
        .filter(|r| r.contract.exp < season)
        .map(|r| r.rpid)
        .collect();
    for rpid in expired {
        state.store.delete::<ReleasedPlayer>(&rpid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sample_state;

    fn cheapest_free_agent(state: &LeagueState) -> u32 {
        state
            .free_agents()
            .into_iter()
            .min_by(|a, b| a.value.total_cmp(&b.value).then(a.pid.cmp(&b.pid)))
            .map(|p| p.pid)
            .unwrap()
    }

    fn trim_roster(state: &mut LeagueState, tid: u32, size: usize) {
        while state.roster_size(tid) > size {
            let pid = state.roster(tid)[0].pid;
            release_player(state, pid).unwrap();
        }
    }

    #[test]
    fn test_sign_free_agent_at_ask() {
        let mut state = sample_state();
        state.ctx.settings.salary_cap = 1_000_000;
        let tid = state.ctx.user_tid;
        trim_roster(&mut state, tid, 5);
        let pid = cheapest_free_agent(&state);

        start_negotiation(&mut state, pid, tid, false).unwrap();
        let ask = asking_amount(&state, pid, tid).unwrap();
        let exp = state.ctx.season + 1;

        if ask > state.ctx.settings.min_contract {
            let low = make_offer(&mut state, pid, ask - 10, exp).unwrap();
            assert_eq!(low, OfferResponse::Rejected { ask });
        }
        let accepted = make_offer(&mut state, pid, ask, exp).unwrap();
        assert!(matches!(accepted, OfferResponse::Accepted(_)));

        let p = state.store.get::<Player>(&pid).unwrap();
        assert_eq!(p.tid, Owner::Team(tid));
        assert_eq!(p.contract.amount, ask);
        assert!(p.contract_desired.is_none());
        assert!(state.store.get::<Negotiation>(&pid).is_none());
    }

    #[test]
    fn test_full_roster_cannot_negotiate() {
        let mut state = sample_state();
        let tid = state.ctx.user_tid;
        let max = state.ctx.settings.max_roster;
        while state.roster_size(tid) < max {
            let pid = cheapest_free_agent(&state);
            sign_player(&mut state, pid, tid, Contract { amount: 750, exp: 2026, rookie: false }).unwrap();
        }
        let pid = cheapest_free_agent(&state);
        let err = start_negotiation(&mut state, pid, tid, false).unwrap_err();
        assert!(matches!(err, LeagueError::Negotiation(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_release_keeps_salary_on_books() {
        let mut state = sample_state();
        let tid = state.ctx.user_tid;
        let before = state.payroll(tid);
        let pid = state.roster(tid)[0].pid;
        release_player(&mut state, pid).unwrap();

        assert_eq!(state.payroll(tid), before);
        let p = state.store.get::<Player>(&pid).unwrap();
        assert_eq!(p.tid, Owner::FreeAgent);
        assert!(p.contract_desired.is_some());

        state.ctx.season += 10;
        expire_released_players(&mut state);
        assert_eq!(state.store.count::<ReleasedPlayer>(), 0);
    }

    #[test]
    fn test_offer_years_checked() {
        let mut state = sample_state();
        let tid = state.ctx.user_tid;
        trim_roster(&mut state, tid, 5);
        let pid = cheapest_free_agent(&state);
        start_negotiation(&mut state, pid, tid, false).unwrap();
        let season = state.ctx.season;
        assert!(make_offer(&mut state, pid, 1_000, season - 1).is_err());
        assert!(make_offer(&mut state, pid, 1_000, season + MAX_CONTRACT_YEARS).is_err());
    }

    #[test]
    fn test_resigning_requires_phase() {
        let mut state = sample_state();
        let tid = state.ctx.user_tid;
        let pid = state.roster(tid)[0].pid;
        assert!(start_negotiation(&mut state, pid, tid, true).is_err());
    }

    fn open_negotiations(state: &mut LeagueState, tid: u32, count: usize) -> Vec<u32> {
        let candidates: Vec<u32> = state.free_agents().into_iter().map(|p| p.pid).collect();
        let mut opened = Vec::new();
        for pid in candidates {
            if opened.len() == count {
                break;
            }
            if start_negotiation(state, pid, tid, false).is_ok() {
                opened.push(pid);
            }
        }
        assert_eq!(opened.len(), count);
        opened
    }

    #[test]
    fn test_offers_stop_at_full_roster() {
        let mut state = sample_state();
        state.ctx.settings.salary_cap = 1_000_000;
        let tid = state.ctx.user_tid;
        let max = state.ctx.settings.max_roster;
        trim_roster(&mut state, tid, max - 1);

        let pids = open_negotiations(&mut state, tid, 3);
        let (amount, exp) = (state.ctx.settings.max_contract, state.ctx.season + 1);
        assert!(matches!(make_offer(&mut state, pids[0], amount, exp).unwrap(), OfferResponse::Accepted(_)));
        for &pid in &pids[1..] {
            let err = make_offer(&mut state, pid, amount, exp).unwrap_err();
            assert!(matches!(err, LeagueError::Negotiation(_)));
            assert_eq!(state.store.get::<Player>(&pid).unwrap().tid, Owner::FreeAgent);
        }
        assert_eq!(state.roster_size(tid), max);
    }

    #[test]
    fn test_offer_for_player_signed_elsewhere() {
        let mut state = sample_state();
        state.ctx.settings.salary_cap = 1_000_000;
        let tid = state.ctx.user_tid;
        trim_roster(&mut state, tid, 5);
        let pid = open_negotiations(&mut state, tid, 1)[0];

        let other = if tid == 0 { 1 } else { 0 };
        let contract = Contract { amount: 750, exp: state.ctx.season + 1, rookie: false };
        sign_player(&mut state, pid, other, contract).unwrap();
        state.store.put(Negotiation { pid, tid, resigning: false });

        let amount = state.ctx.settings.max_contract;
        let exp = state.ctx.season + 1;
        let err = make_offer(&mut state, pid, amount, exp).unwrap_err();
        assert!(matches!(err, LeagueError::Negotiation(_)));
        assert_eq!(state.store.get::<Player>(&pid).unwrap().tid, Owner::Team(other));
    }

    #[test]
    fn test_only_free_agents_can_negotiate() {
        let mut state = sample_state();
        let tid = state.ctx.user_tid;
        trim_roster(&mut state, tid, 5);
        let other = if tid == 0 { 1 } else { 0 };
        let rostered = state.roster(other)[0].pid;
        let prospect = state.store.get_all::<Player>().find(|p| p.tid == Owner::Undrafted(1)).unwrap().pid;

        for pid in [rostered, prospect] {
            assert!(matches!(start_negotiation(&mut state, pid, tid, false), Err(LeagueError::Negotiation(_))));
            assert!(state.store.get::<Negotiation>(&pid).is_none());
        }
    }

    #[test]
    fn test_offer_amount_checked() {
        let mut state = sample_state();
        let tid = state.ctx.user_tid;
        trim_roster(&mut state, tid, 5);
        let pid = open_negotiations(&mut state, tid, 1)[0];
        let (min, max) = (state.ctx.settings.min_contract, state.ctx.settings.max_contract);
        let exp = state.ctx.season + 1;
        assert!(make_offer(&mut state, pid, min - 10, exp).is_err());
        assert!(make_offer(&mut state, pid, max + 10, exp).is_err());
        assert_eq!(state.store.get::<Player>(&pid).unwrap().tid, Owner::FreeAgent);
    }
}
