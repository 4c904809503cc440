//! League database: typed, indexed collections held in memory.
//!
//! Every write goes through [`EntityStore`] so the revision counter moves
//! with it; the update dispatcher compares revisions to decide staleness.
//! Multi-step mutations use [`EntityStore::transaction`], which stages a
//! copy and only swaps it in when the closure succeeds.

pub mod collection;
pub mod records;
pub mod table;

pub use collection::Collection;
pub use table::{IndexDef, IndexKey, Record, Table};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeBounds;

use crate::error::{LeagueError, Result};
use crate::models::*;

/// Access to the table holding records of type `T`.
pub trait HasTable<T: Record> {
    fn table(&self) -> &Table<T>;
    fn table_mut(&mut self) -> &mut Table<T>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    revision: u64,
    players: Table<Player>,
    released_players: Table<ReleasedPlayer>,
    awards: Table<Award>,
    player_stats: Table<PlayerStatsRow>,
    teams: Table<Team>,
    schedule: Table<ScheduledGame>,
    playoff_series: Table<PlayoffSeries>,
    draft_picks: Table<DraftPick>,
    trade: Table<TradeProposal>,
    negotiations: Table<Negotiation>,
    game_attributes: Table<GameAttribute>,
    draft_order: Table<DraftSlot>,
    messages: Table<Message>,
    events: Table<LeagueEvent>,
    games: Table<Game>,
    player_feats: Table<Feat>,
}

macro_rules! has_table {
    ($($ty:ty => $field:ident : $variant:ident),* $(,)?) => {
        $(
            impl HasTable<$ty> for EntityStore {
                fn table(&self) -> &Table<$ty> {
                    &self.$field
                }

                fn table_mut(&mut self) -> &mut Table<$ty> {
                    &mut self.$field
                }
            }
        )*

        impl EntityStore {
            /// Every row of `collection`, serialized to JSON values.
            pub fn collection_to_json(&self, collection: Collection) -> Result<Vec<Value>> {
                match collection {
                    $(
                        Collection::$variant => self
                            .$field
                            .iter()
                            .map(|row| serde_json::to_value(row).map_err(LeagueError::from))
                            .collect(),
                    )*
                }
            }

            /// Replaces `collection` with rows parsed from JSON values.
            pub fn collection_from_json(&mut self, collection: Collection, rows: Vec<Value>) -> Result<()> {
                match collection {
                    $(
                        Collection::$variant => {
                            let parsed = rows
                                .into_iter()
                                .map(serde_json::from_value::<$ty>)
                                .collect::<std::result::Result<Vec<_>, _>>()?;
                            self.$field = Table::from_rows(parsed);
                        }
                    )*
                }
                self.revision += 1;
                Ok(())
            }

            pub fn collection_len(&self, collection: Collection) -> usize {
                match collection {
                    $( Collection::$variant => self.$field.len(), )*
                }
            }
        }
    };
}

has_table! {
    Player => players: Players,
    ReleasedPlayer => released_players: ReleasedPlayers,
    Award => awards: Awards,
    PlayerStatsRow => player_stats: PlayerStats,
    Team => teams: Teams,
    ScheduledGame => schedule: Schedule,
    PlayoffSeries => playoff_series: PlayoffSeries,
    DraftPick => draft_picks: DraftPicks,
    TradeProposal => trade: Trade,
    Negotiation => negotiations: Negotiations,
    GameAttribute => game_attributes: GameAttributes,
    DraftSlot => draft_order: DraftOrder,
    Message => messages: Messages,
    LeagueEvent => events: Events,
    Game => games: Games,
    Feat => player_feats: PlayerFeats,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dirty marker: bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get<T: Record>(&self, key: &T::Key) -> Option<&T>
    where
        Self: HasTable<T>,
    {
        <Self as HasTable<T>>::table(self).get(key)
    }

    pub fn get_all<T: Record>(&self) -> impl Iterator<Item = &T>
    where
        Self: HasTable<T>,
    {
        <Self as HasTable<T>>::table(self).iter()
    }

    pub fn count<T: Record>(&self) -> usize
    where
        Self: HasTable<T>,
    {
        <Self as HasTable<T>>::table(self).len()
    }

    pub fn index_get_all<T: Record, R>(&self, index: &str, range: R) -> Result<Vec<&T>>
    where
        Self: HasTable<T>,
        R: RangeBounds<IndexKey>,
    {
        <Self as HasTable<T>>::table(self).index_get_all(index, range)
    }

    pub fn index_get<T: Record>(&self, index: &str, key: &[i64]) -> Result<Vec<&T>>
    where
        Self: HasTable<T>,
    {
        <Self as HasTable<T>>::table(self).index_get(index, key)
    }

    pub fn index_prefix<T: Record>(&self, index: &str, prefix: &[i64]) -> Result<Vec<&T>>
    where
        Self: HasTable<T>,
    {
        <Self as HasTable<T>>::table(self).index_prefix(index, prefix)
    }

    pub fn put<T: Record>(&mut self, row: T) -> Option<T>
    where
        Self: HasTable<T>,
    {
        self.revision += 1;
        <Self as HasTable<T>>::table_mut(self).put(row)
    }

    pub fn delete<T: Record>(&mut self, key: &T::Key) -> Option<T>
    where
        Self: HasTable<T>,
    {
        self.revision += 1;
        <Self as HasTable<T>>::table_mut(self).delete(key)
    }

    /// In-place update. Returns false (without bumping the revision) when the
    /// key is absent.
    pub fn update<T: Record>(&mut self, key: &T::Key, f: impl FnOnce(&mut T)) -> bool
    where
        Self: HasTable<T>,
    {
        let updated = <Self as HasTable<T>>::table_mut(self).update(key, f);
        if updated {
            self.revision += 1;
        }
        updated
    }

    pub fn next_id<T: Record<Key = u32>>(&self) -> u32
    where
        Self: HasTable<T>,
    {
        <Self as HasTable<T>>::table(self).next_id()
    }

    /// Runs `f` against a staged copy. The copy replaces `self` only if `f`
    /// returns `Ok`; on error the store is untouched.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut EntityStore) -> Result<R>) -> Result<R> {
        let mut staged = self.clone();
        let out = f(&mut staged)?;
        *self = staged;
        Ok(out)
    }

    // ========================
    // Common queries
    // ========================

    pub fn players_with_owner(&self, owner: Owner) -> Vec<&Player> {
        self.players.index_get("tid", &[owner.tid() as i64]).unwrap_or_default()
    }

    pub fn stats_row(&self, pid: u32, season: u16, playoffs: bool) -> Option<&PlayerStatsRow> {
        self.player_stats
            .index_get("pid, season, playoffs", &[pid as i64, season as i64, playoffs as i64])
            .ok()
            .and_then(|rows| rows.into_iter().next())
    }

    pub fn stats_rows_for(&self, pid: u32) -> Vec<&PlayerStatsRow> {
        self.player_stats.index_get("pid", &[pid as i64]).unwrap_or_default()
    }

    pub fn team_ids(&self) -> Vec<u32> {
        self.teams.iter().map(|t| t.tid).collect()
    }

    pub fn log_event(
        &mut self,
        season: u16,
        phase: Phase,
        kind: EventKind,
        text: String,
        pids: Vec<u32>,
        tids: Vec<u32>,
    ) {
        let eid = self.events.next_id();
        self.put(LeagueEvent { eid, season, phase, kind, text, pids, tids });
    }

    pub fn add_message(&mut self, season: u16, phase: Phase, from: &str, text: String) {
        let mid = self.messages.next_id();
        self.put(Message { mid, season, phase, from: from.to_string(), text, read: false });
    }

    /// Cross-collection invariants: team references, one rating per season,
    /// one stat row per (season, playoffs), and the three draft classes.
    pub fn check_integrity(&self) -> Result<()> {
        for p in self.players.iter() {
            if let Owner::Team(tid) = p.tid {
                if !self.teams.contains(&tid) {
                    return Err(LeagueError::Integrity(format!(
                        "player {} references missing team {}",
                        p.pid, tid
                    )));
                }
            }
            let mut seasons: Vec<u16> = p.ratings.iter().map(|r| r.season).collect();
            seasons.sort_unstable();
            if seasons.windows(2).any(|w| w[0] == w[1]) {
                return Err(LeagueError::Integrity(format!(
                    "player {} has duplicate rating seasons",
                    p.pid
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for row in self.player_stats.iter() {
            if !seen.insert((row.pid, row.season, row.playoffs)) {
                return Err(LeagueError::Integrity(format!(
                    "player {} has duplicate stats for season {} (playoffs: {})",
                    row.pid, row.season, row.playoffs
                )));
            }
        }

        for class in Owner::draft_classes() {
            if self.players_with_owner(class).is_empty() {
                return Err(LeagueError::MissingDraftClass(class));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
