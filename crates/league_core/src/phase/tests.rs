use super::*;
use crate::market::release_player;
use crate::models::{DraftPick, DraftSlot, Owner, Player, PlayoffSeries, ScheduledGame, Team};
use crate::player::DefaultDevelopment;
use crate::sim::{play_days, play_until_end, RatingsSimulator};
use crate::testutil::{fix_user_roster, sample_state};

fn dev() -> DefaultDevelopment {
    DefaultDevelopment::default()
}

/// Plays one full season from the preseason through free agency.
fn run_season(state: &mut LeagueState) {
    let sim = RatingsSimulator::default();
    fix_user_roster(state);
    advance(state, Phase::RegularSeason, &dev()).unwrap();
    play_until_end(state, &sim).unwrap();
    advance(state, Phase::Playoffs, &dev()).unwrap();
    play_until_end(state, &sim).unwrap();
    advance(state, Phase::BeforeDraft, &dev()).unwrap();
    advance(state, Phase::Draft, &dev()).unwrap();
    until_end(state).unwrap();
    advance(state, Phase::AfterDraft, &dev()).unwrap();
    advance(state, Phase::ResignPlayers, &dev()).unwrap();
    advance(state, Phase::FreeAgency, &dev()).unwrap();
    advance(state, Phase::Preseason, &dev()).unwrap();
}

fn assert_three_classes(state: &LeagueState) {
    for class in Owner::draft_classes() {
        assert!(!state.store.players_with_owner(class).is_empty(), "{} is empty", class);
    }
}

#[test]
fn test_illegal_transition_changes_nothing() {
    let mut state = sample_state();
    let revision = state.store.revision();
    let err = advance(&mut state, Phase::Playoffs, &dev()).unwrap_err();
    assert_eq!(err, LeagueError::IllegalTransition { from: Phase::Preseason, to: Phase::Playoffs });
    assert_eq!(state.ctx.phase, Phase::Preseason);
    assert_eq!(state.store.revision(), revision);
}

#[test]
fn test_playoffs_refused_with_games_left() {
    let mut state = sample_state();
    state.ctx.settings.trade_deadline = None;
    fix_user_roster(&mut state);
    advance(&mut state, Phase::RegularSeason, &dev()).unwrap();
    // Five of six days: 80% of the schedule.
    play_days(&mut state, 5, &RatingsSimulator::default()).unwrap();
    assert_eq!(state.store.count::<ScheduledGame>(), 2);

    let revision = state.store.revision();
    let err = advance(&mut state, Phase::Playoffs, &dev()).unwrap_err();
    assert!(matches!(err, LeagueError::PhasePrecondition { phase: Phase::RegularSeason, .. }));
    assert_eq!(state.ctx.phase.code(), 1);
    assert_eq!(state.store.revision(), revision);
    assert!(state.store.get::<PlayoffSeries>(&2025).is_none());
}

#[test]
fn test_user_roster_must_be_legal() {
    let mut state = sample_state();
    let tid = state.ctx.user_tid;
    while state.roster_size(tid) >= state.ctx.settings.min_roster {
        let pid = state.roster(tid)[0].pid;
        release_player(&mut state, pid).unwrap();
    }
    let err = advance(&mut state, Phase::RegularSeason, &dev()).unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(state.ctx.phase, Phase::Preseason);
    assert_eq!(state.store.count::<ScheduledGame>(), 0);
}

#[test]
fn test_regular_season_schedule() {
    let mut state = sample_state();
    fix_user_roster(&mut state);
    let events = advance(&mut state, Phase::RegularSeason, &dev()).unwrap();
    assert!(events.contains(UpdateEvent::NewPhase));
    assert_eq!(state.store.count::<ScheduledGame>(), 12);
    for tid in state.store.team_ids() {
        let n = state.roster_size(tid);
        assert!((5..=7).contains(&n), "team {} has {}", tid, n);
    }
}

#[test]
fn test_draft_keeps_three_classes() {
    let mut state = sample_state();
    let sim = RatingsSimulator::default();
    fix_user_roster(&mut state);
    advance(&mut state, Phase::RegularSeason, &dev()).unwrap();
    play_until_end(&mut state, &sim).unwrap();
    advance(&mut state, Phase::Playoffs, &dev()).unwrap();

    let err = advance(&mut state, Phase::BeforeDraft, &dev()).unwrap_err();
    assert!(matches!(err, LeagueError::PhasePrecondition { .. }));
    play_until_end(&mut state, &sim).unwrap();

    advance(&mut state, Phase::BeforeDraft, &dev()).unwrap();
    assert_three_classes(&state);
    advance(&mut state, Phase::Draft, &dev()).unwrap();
    assert_three_classes(&state);
    // Two rounds of four teams.
    assert_eq!(state.store.count::<DraftSlot>(), 8);
    let first = on_the_clock(&state).unwrap();
    let standings = crate::sim::standings(&state, 2025);
    assert_eq!(first.original_tid, *standings.last().unwrap());

    let err = advance(&mut state, Phase::AfterDraft, &dev()).unwrap_err();
    assert!(matches!(err, LeagueError::PhasePrecondition { .. }));

    let class_2026: Vec<u32> = state.store.players_with_owner(Owner::Undrafted(2)).iter().map(|p| p.pid).collect();
    let picked = until_end(&mut state).unwrap();
    assert_eq!(picked.len(), 8);
    let rookie = state.store.get::<Player>(&picked[0]).unwrap();
    assert!(rookie.contract.rookie);
    assert_eq!(rookie.draft.year, 2025);
    assert_eq!(rookie.draft.pick, 1);

    advance(&mut state, Phase::AfterDraft, &dev()).unwrap();
    assert_three_classes(&state);
    assert!(class_2026.iter().all(|pid| state.store.get::<Player>(pid).unwrap().tid == Owner::Undrafted(1)));
    assert!(state.store.players_with_owner(Owner::Undrafted(3)).iter().all(|p| p.draft.year == 2028));
    // The used season of picks is gone and a new one exists.
    assert!(state.store.get_all::<DraftPick>().all(|dp| dp.season > 2025));
    assert!(state.store.get_all::<DraftPick>().any(|dp| dp.season == 2029));
}

#[test]
fn test_user_pick_waits_for_user() {
    let mut state = sample_state();
    state.ctx.phase = Phase::BeforeDraft;
    advance(&mut state, Phase::Draft, &dev()).unwrap();

    let before_user = until_user_or_end(&mut state).unwrap();
    let slot = on_the_clock(&state).unwrap();
    assert_eq!(slot.tid, state.ctx.user_tid);
    assert_eq!(before_user.len(), slot.slot as usize);

    let pid = available(&state).unwrap()[0].pid;
    select_player(&mut state, pid).unwrap();
    assert_eq!(state.store.get::<Player>(&pid).unwrap().tid, Owner::Team(state.ctx.user_tid));
    // Someone else is on the clock now.
    if let Some(next) = on_the_clock(&state) {
        if !state.ctx.is_user_team(next.tid) {
            let other = available(&state).unwrap()[0].pid;
            assert!(matches!(select_player(&mut state, other), Err(LeagueError::Draft(_))));
        }
    }
}

#[test]
fn test_full_seasons_keep_invariants() {
    let mut state = sample_state();
    run_season(&mut state);
    run_season(&mut state);
    assert_eq!(state.ctx.season, 2027);
    assert_eq!(state.ctx.phase, Phase::Preseason);
    state.store.check_integrity().unwrap();
    assert_three_classes(&state);

    for p in state.store.get_all::<Player>().filter(|p| p.tid.is_team()) {
        assert!(p.rating(2027).is_some(), "player {} has no 2027 ratings", p.pid);
    }
    for t in state.store.get_all::<Team>() {
        assert!(t.season(2027).is_some());
        assert!(t.season(2026).unwrap().playoff_rounds_won >= -1);
    }
    assert_eq!(
        state.store.count::<DraftPick>(),
        4 * state.ctx.settings.draft_rounds as usize * state.ctx.settings.future_pick_seasons as usize
    );
}

#[test]
fn test_seasons_are_reproducible() {
    let run = || {
        let mut state = sample_state();
        run_season(&mut state);
        state.store.get_all::<Player>().cloned().collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_fantasy_draft_redistributes_players() {
    let mut state = sample_state();
    let rostered: usize = state.store.team_ids().iter().map(|&t| state.roster_size(t)).sum();
    advance(&mut state, Phase::FantasyDraft, &dev()).unwrap();
    assert_eq!(state.store.players_with_owner(Owner::FantasyDraftTemp).len(), rostered);
    assert!(state.store.team_ids().iter().all(|&t| state.roster_size(t) == 0));

    until_end(&mut state).unwrap();
    advance(&mut state, Phase::Preseason, &dev()).unwrap();
    assert_eq!(state.ctx.season, 2025);
    assert!(state.store.players_with_owner(Owner::FantasyDraftTemp).is_empty());
    let after: usize = state.store.team_ids().iter().map(|&t| state.roster_size(t)).sum();
    assert_eq!(after, rostered);
}
