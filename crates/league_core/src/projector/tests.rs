use super::*;
use crate::error::LeagueError;
use crate::models::{Owner, Player, PlayerStatsRow, StatLine, Team};
use crate::state::LeagueState;
use crate::testutil::{sample_state, SEASON};

fn add_stats(state: &mut LeagueState, pid: u32, tid: u32, season: u16, line: StatLine) {
    let psid = state.store.next_id::<PlayerStatsRow>();
    state.store.put(PlayerStatsRow { psid, pid, tid, season, playoffs: false, line });
}

fn first_rostered(state: &LeagueState) -> (u32, u32) {
    let tid = state.ctx.user_tid;
    (state.roster(tid)[0].pid, tid)
}

fn ratings_only() -> FieldSelection {
    FieldSelection { ratings: vec![RatingField::Ovr, RatingField::Hgt, RatingField::Spd], ..Default::default() }
}

// ========================
// Ratings and fuzz
// ========================

#[test]
fn test_fuzz_is_stable_per_player_season() {
    let mut state = sample_state();
    let (pid, _) = first_rostered(&state);
    state.store.update::<Player>(&pid, |p| {
        let r = p.latest_rating_mut().unwrap();
        r.fuzz = 4.0;
        r.hgt = 98;
        r.spd = 50;
    });
    let p = state.store.get::<Player>(&pid).unwrap();
    let opts = ProjectionOptions { fuzz: true, ..Default::default() };

    let first = project_player(&state, p, &ratings_only(), &opts);
    let second = project_player(&state, p, &ratings_only(), &opts);
    assert_eq!(first, second);
    assert_eq!(first.rating(RatingField::Spd), Some(54.0));
    assert_eq!(first.rating(RatingField::Hgt), Some(100.0));

    let plain = project_player(&state, p, &ratings_only(), &ProjectionOptions::default());
    assert_eq!(plain.rating(RatingField::Spd), Some(50.0));
}

#[test]
fn test_missing_season_snapshot_gives_empty_ratings() {
    let state = sample_state();
    let (pid, _) = first_rostered(&state);
    let p = state.store.get::<Player>(&pid).unwrap();
    let opts = ProjectionOptions { season: Some(SEASON - 3), ..Default::default() };
    let view = project_player(&state, p, &ratings_only(), &opts);
    assert!(view.ratings.is_empty());
}

// ========================
// Stats
// ========================

#[test]
fn test_stats_summed_and_scaled() {
    let mut state = sample_state();
    let (pid, tid) = first_rostered(&state);
    add_stats(&mut state, pid, tid, SEASON, StatLine { gp: 2, min: 60.0, pts: 30, fg: 12, fga: 24, ..Default::default() });
    add_stats(&mut state, pid, tid, SEASON - 1, StatLine { gp: 2, min: 60.0, pts: 10, ..Default::default() });

    let sel = FieldSelection { stats: vec![StatField::Pts, StatField::Fgp, StatField::Ftp], ..Default::default() };
    let p = state.store.get::<Player>(&pid).unwrap();

    let season = ProjectionOptions { season: Some(SEASON), stat_type: StatType::PerGame, ..Default::default() };
    let view = project_player(&state, p, &sel, &season);
    assert_eq!(view.stat(StatField::Pts), Some(15.0));
    assert_eq!(view.stat(StatField::Fgp), Some(50.0));
    assert_eq!(view.stat(StatField::Ftp), Some(0.0));

    let career = ProjectionOptions::default();
    let view = project_player(&state, p, &sel, &career);
    assert_eq!(view.stat(StatField::Pts), Some(40.0));
}

#[test]
fn test_retired_player_without_stats() {
    let mut state = sample_state();
    let (pid, _) = first_rostered(&state);
    state.store.update::<Player>(&pid, |p| {
        p.tid = Owner::Retired;
        p.retired_year = Some(SEASON);
    });

    let sel = FieldSelection { attrs: vec![PlayerAttr::Name], stats: vec![StatField::Pts], ..Default::default() };
    let opts = ProjectionOptions { season: Some(SEASON), ..Default::default() };
    let p = state.store.get::<Player>(&pid).unwrap();

    let view = project_player(&state, p, &sel, &opts);
    assert!(view.stats.is_empty());
    assert!(players_plus(&state, [p], &sel, &opts).is_empty());

    let shown = ProjectionOptions { show_no_stats: true, ..opts };
    let views = players_plus(&state, [p], &sel, &shown);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].stat(StatField::Pts), Some(0.0));
}

#[test]
fn test_show_rookies_includes_this_seasons_picks() {
    let mut state = sample_state();
    let (pid, tid) = first_rostered(&state);
    state.store.update::<Player>(&pid, |p| {
        p.draft.year = SEASON;
        p.draft.round = 1;
        p.draft.pick = 1;
        p.draft.tid = Some(tid);
    });
    let sel = FieldSelection { stats: vec![StatField::Pts], ..Default::default() };
    let opts = ProjectionOptions { season: Some(SEASON), show_rookies: true, ..Default::default() };
    let p = state.store.get::<Player>(&pid).unwrap();
    assert_eq!(players_plus(&state, [p], &sel, &opts).len(), 1);
}

#[test]
fn test_tid_filter_on_stats() {
    let mut state = sample_state();
    let (pid, tid) = first_rostered(&state);
    add_stats(&mut state, pid, tid, SEASON, StatLine { gp: 1, pts: 8, ..Default::default() });
    let sel = FieldSelection { stats: vec![StatField::Pts], ..Default::default() };
    let p = state.store.get::<Player>(&pid).unwrap();

    let other = ProjectionOptions { season: Some(SEASON), tid: Some(tid + 1), ..Default::default() };
    assert!(players_plus(&state, [p], &sel, &other).is_empty());
}

#[test]
fn test_selection_parse_rejects_unknown() {
    let err = FieldSelection::parse(&["name"], &["ovr"], &["pts", "bogus"]).unwrap_err();
    assert!(matches!(err, LeagueError::UnknownField { kind: FieldKind::Stat, .. }));
}

// ========================
// Teams
// ========================

#[test]
fn test_teams_plus() {
    let mut state = sample_state();
    state.store.update::<Team>(&0, |t| {
        let row = t.season_mut(SEASON).unwrap();
        row.won = 3;
        row.lost = 1;
        let stats = t.stats_row_mut(SEASON, false);
        stats.line = StatLine { gp: 4, pts: 400, ..Default::default() };
        stats.opp_pts = 380;
    });

    let sel = TeamFieldSelection::parse(&["abbrev"], &["winp", "payroll"], &["pts", "diff"]).unwrap();
    let opts = TeamOptions { stat_type: StatType::PerGame, ..Default::default() };
    let views = teams_plus(&state, &sel, &opts);
    assert_eq!(views.len(), 4);
    assert_eq!(views[0].season_attrs["winp"], serde_json::json!(0.75));
    assert_eq!(views[0].stat(TeamStatField::Pts), Some(100.0));
    assert_eq!(views[0].stat(TeamStatField::Diff), Some(5.0));
    assert_eq!(views[1].stat(TeamStatField::Pts), Some(0.0));
}

// ========================
// Percentages
// ========================

mod props {
    use super::*;
    use proptest::prelude::*;

    fn stat_type(code: u8) -> StatType {
        match code % 3 {
            0 => StatType::Totals,
            1 => StatType::PerGame,
            _ => StatType::Per36,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_percentages_bounded(
            shots in proptest::collection::vec(0u32..30, 6),
            gp in 1u32..5,
            code in any::<u8>()
        ) {
            let mut state = sample_state();
            let (pid, tid) = first_rostered(&state);
            let line = StatLine {
                gp,
                min: gp as f64 * 30.0,
                fg: shots[0],
                fga: shots[1],
                tp: shots[2],
                tpa: shots[3],
                ft: shots[4],
                fta: shots[5],
                ..Default::default()
            };
            add_stats(&mut state, pid, tid, SEASON, line);

            let sel = FieldSelection { stats: vec![StatField::Fgp, StatField::Tpp, StatField::Ftp], ..Default::default() };
            let opts = ProjectionOptions { season: Some(SEASON), stat_type: stat_type(code), ..Default::default() };
            let p = state.store.get::<Player>(&pid).unwrap();
            let view = project_player(&state, p, &sel, &opts);

            for (field, attempts) in [(StatField::Fgp, line.fga), (StatField::Tpp, line.tpa), (StatField::Ftp, line.fta)] {
                let value = view.stat(field).unwrap();
                prop_assert!(!value.is_nan());
                prop_assert!((0.0..=100.0).contains(&value));
                if attempts == 0 {
                    prop_assert_eq!(value, 0.0);
                }
            }
        }
    }
}
