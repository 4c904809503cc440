use super::*;
use crate::testutil::{sample_player, sample_team};

fn store_with_roster() -> EntityStore {
    let mut store = EntityStore::new();
    store.put(sample_team(0));
    store.put(sample_team(1));
    for pid in 0..4 {
        store.put(sample_player(pid, Owner::Team(pid % 2)));
    }
    store.put(sample_player(10, Owner::FreeAgent));
    for (i, class) in Owner::draft_classes().into_iter().enumerate() {
        store.put(sample_player(20 + i as u32, class));
    }
    store
}

#[test]
fn test_get_unknown_key_is_none() {
    let store = store_with_roster();
    assert!(store.get::<Player>(&999).is_none());
    assert!(store.index_get::<Player>("tid", &[7]).unwrap().is_empty());
}

#[test]
fn test_players_by_team_index() {
    let store = store_with_roster();
    let team0: Vec<u32> = store.players_with_owner(Owner::Team(0)).iter().map(|p| p.pid).collect();
    assert_eq!(team0, vec![0, 2]);
    assert_eq!(store.players_with_owner(Owner::FreeAgent).len(), 1);
}

#[test]
fn test_update_moves_index_entry() {
    let mut store = store_with_roster();
    let before = store.revision();
    assert!(store.update::<Player>(&0, |p| p.tid = Owner::FreeAgent));
    assert!(store.revision() > before);
    assert_eq!(store.players_with_owner(Owner::Team(0)).len(), 1);
    assert_eq!(store.players_with_owner(Owner::FreeAgent).len(), 2);

    let rev = store.revision();
    assert!(!store.update::<Player>(&500, |p| p.watch = true));
    assert_eq!(store.revision(), rev);
}

#[test]
fn test_unknown_index_is_error() {
    let store = store_with_roster();
    let err = store.index_get::<Player>("nope", &[0]).unwrap_err();
    assert!(matches!(err, LeagueError::UnknownIndex { collection: "players", .. }));
}

#[test]
fn test_compound_index_prefix() {
    let mut store = EntityStore::new();
    for (psid, (season, playoffs)) in [(2025, false), (2025, true), (2026, false)].into_iter().enumerate() {
        store.put(PlayerStatsRow {
            psid: psid as u32,
            pid: 3,
            tid: 0,
            season,
            playoffs,
            line: StatLine::default(),
        });
    }
    let seasons = store.index_prefix::<PlayerStatsRow>("pid, season, playoffs", &[3, 2025]).unwrap();
    assert_eq!(seasons.len(), 2);
    assert!(store.stats_row(3, 2025, true).is_some());
    assert!(store.stats_row(3, 2026, true).is_none());
    assert_eq!(store.stats_rows_for(3).len(), 3);
}

#[test]
fn test_failed_transaction_leaves_store_untouched() {
    let mut store = store_with_roster();
    let rev = store.revision();
    let result: Result<()> = store.transaction(|staged| {
        staged.update::<Player>(&1, |p| p.tid = Owner::Retired);
        staged.delete::<Team>(&1);
        Err(LeagueError::Integrity("abort".into()))
    });
    assert!(result.is_err());
    assert_eq!(store.revision(), rev);
    assert_eq!(store.get::<Player>(&1).unwrap().tid, Owner::Team(1));
    assert!(store.get::<Team>(&1).is_some());
}

#[test]
fn test_committed_transaction_is_visible() {
    let mut store = store_with_roster();
    store
        .transaction(|staged| {
            staged.update::<Player>(&1, |p| p.tid = Owner::Retired);
            Ok(())
        })
        .unwrap();
    assert_eq!(store.get::<Player>(&1).unwrap().tid, Owner::Retired);
}

#[test]
fn test_integrity_checks() {
    let mut store = store_with_roster();
    assert!(store.check_integrity().is_ok());

    store.update::<Player>(&0, |p| p.tid = Owner::Team(42));
    assert!(matches!(store.check_integrity(), Err(LeagueError::Integrity(_))));
    store.update::<Player>(&0, |p| p.tid = Owner::Team(0));

    store.update::<Player>(&22, |p| p.tid = Owner::FreeAgent);
    assert_eq!(store.check_integrity(), Err(LeagueError::MissingDraftClass(Owner::Undrafted(3))));
}

#[test]
fn test_collection_json_round_trip() {
    let store = store_with_roster();
    let rows = store.collection_to_json(Collection::Players).unwrap();
    assert_eq!(rows.len(), store.count::<Player>());
    assert_eq!(rows[0]["tid"], serde_json::json!(0));

    let mut copy = EntityStore::new();
    copy.collection_from_json(Collection::Players, rows).unwrap();
    assert_eq!(copy.get::<Player>(&10), store.get::<Player>(&10));
    assert_eq!(copy.players_with_owner(Owner::FreeAgent).len(), 1);
}

#[test]
fn test_next_id() {
    let mut store = EntityStore::new();
    assert_eq!(store.next_id::<Message>(), 0);
    store.add_message(2025, Phase::Preseason, "Owner", "Welcome".into());
    store.add_message(2025, Phase::Preseason, "Owner", "Win".into());
    assert_eq!(store.next_id::<Message>(), 2);
}

mod props {
    use super::*;
    use crate::error::LeagueError;
    use proptest::prelude::*;

    fn owner(code: u8) -> Owner {
        match code % 4 {
            0 => Owner::Team(0),
            1 => Owner::Team(1),
            2 => Owner::FreeAgent,
            _ => Owner::Retired,
        }
    }

    fn owners_match_scan(store: &EntityStore) -> bool {
        [Owner::Team(0), Owner::Team(1), Owner::FreeAgent, Owner::Retired].into_iter().all(|o| {
            let indexed: Vec<u32> = store.players_with_owner(o).iter().map(|p| p.pid).collect();
            let scanned: Vec<u32> = store.get_all::<Player>().filter(|p| p.tid == o).map(|p| p.pid).collect();
            indexed == scanned
        })
    }

    proptest! {
        #[test]
        fn prop_owner_index_follows_updates(moves in proptest::collection::vec((0u32..4, any::<u8>()), 0..40)) {
            let mut store = store_with_roster();
            for (pid, code) in moves {
                store.update::<Player>(&pid, |p| p.tid = owner(code));
                prop_assert!(owners_match_scan(&store));
            }
        }

        #[test]
        fn prop_failed_transaction_changes_nothing(moves in proptest::collection::vec((0u32..4, any::<u8>()), 1..20)) {
            let mut store = store_with_roster();
            let revision = store.revision();
            let before = store.collection_to_json(Collection::Players).unwrap();

            let result: Result<()> = store.transaction(|s| {
                for (pid, code) in &moves {
                    s.update::<Player>(pid, |p| p.tid = owner(*code));
                    s.delete::<Player>(&10);
                }
                Err(LeagueError::Integrity("rolled back".into()))
            });

            prop_assert!(result.is_err());
            prop_assert_eq!(store.revision(), revision);
            prop_assert_eq!(store.collection_to_json(Collection::Players).unwrap(), before);
            prop_assert!(owners_match_scan(&store));
        }
    }
}
