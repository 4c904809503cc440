//! Draft prospect ordering.

use std::cmp::Ordering;

use crate::models::{Owner, Player};
use crate::store::EntityStore;

/// Best prospect first: `value_fuzz` descending, ties by pid ascending.
pub fn compare_prospects(a: &Player, b: &Player) -> Ordering {
    b.value_fuzz.total_cmp(&a.value_fuzz).then(a.pid.cmp(&b.pid))
}

pub fn rank_prospects<'a>(mut players: Vec<&'a Player>) -> Vec<&'a Player> {
    players.sort_by(|a, b| compare_prospects(a, b));
    players
}

/// The ranked pool of `class`.
pub fn ranked_class(store: &EntityStore, class: Owner) -> Vec<&Player> {
    rank_prospects(store.players_with_owner(class))
}
