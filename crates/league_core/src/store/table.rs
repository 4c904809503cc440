use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Debug;
use std::ops::RangeBounds;

use super::collection::Collection;
use crate::error::{LeagueError, Result};

/// Secondary index key. Compound indexes compare lexicographically, so a
/// one-element key range covers every compound key with that prefix.
pub type IndexKey = Vec<i64>;

pub struct IndexDef<T> {
    pub name: &'static str,
    pub extract: fn(&T) -> IndexKey,
}

/// A row type stored in an [`EntityStore`](super::EntityStore) collection.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Key: Ord + Clone + Debug + Send + Sync;

    const COLLECTION: Collection;

    fn key(&self) -> Self::Key;

    fn indexes() -> &'static [IndexDef<Self>] {
        &[]
    }
}

/// Primary-keyed rows plus their secondary indexes.
///
/// Serializes as a plain sequence of rows; indexes are rebuilt on load.
pub struct Table<T: Record> {
    rows: BTreeMap<T::Key, T>,
    indexes: HashMap<&'static str, BTreeMap<IndexKey, BTreeSet<T::Key>>>,
}

impl<T: Record> Table<T> {
    pub fn new() -> Self {
        let indexes = T::indexes().iter().map(|def| (def.name, BTreeMap::new())).collect();
        Self { rows: BTreeMap::new(), indexes }
    }

    pub fn from_rows(rows: impl IntoIterator<Item = T>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.put(row);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.rows.get(key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.rows.contains_key(key)
    }

    /// Rows in primary-key order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn put(&mut self, row: T) -> Option<T> {
        let key = row.key();
        let previous = self.rows.remove(&key);
        if let Some(old) = &previous {
            self.unindex(old);
        }
        self.index(&row);
        self.rows.insert(key, row);
        previous
    }

    pub fn delete(&mut self, key: &T::Key) -> Option<T> {
        let row = self.rows.remove(key)?;
        self.unindex(&row);
        Some(row)
    }

    /// Applies `f` to the row in place, keeping indexes current. Returns
    /// false when the key does not exist.
    pub fn update(&mut self, key: &T::Key, f: impl FnOnce(&mut T)) -> bool {
        let Some(mut row) = self.rows.remove(key) else {
            return false;
        };
        self.unindex(&row);
        f(&mut row);
        debug_assert_eq!(&row.key(), key, "update must not change the primary key");
        self.index(&row);
        self.rows.insert(row.key(), row);
        true
    }

    pub fn index_get_all<R>(&self, index: &str, range: R) -> Result<Vec<&T>>
    where
        R: RangeBounds<IndexKey>,
    {
        let idx = self.indexes.get(index).ok_or_else(|| LeagueError::UnknownIndex {
            collection: T::COLLECTION.name(),
            index: index.to_string(),
        })?;
        Ok(idx
            .range(range)
            .flat_map(|(_, keys)| keys.iter())
            .filter_map(|key| self.rows.get(key))
            .collect())
    }

    /// Rows whose index key equals `key` exactly.
    pub fn index_get(&self, index: &str, key: &[i64]) -> Result<Vec<&T>> {
        let key = key.to_vec();
        self.index_get_all(index, key.clone()..=key)
    }

    /// Rows whose compound index key starts with `prefix`.
    pub fn index_prefix(&self, index: &str, prefix: &[i64]) -> Result<Vec<&T>> {
        let start = prefix.to_vec();
        let mut end = prefix.to_vec();
        match end.last_mut() {
            Some(last) => *last += 1,
            None => return Ok(self.iter().collect()),
        }
        self.index_get_all(index, start..end)
    }

    fn index(&mut self, row: &T) {
        for def in T::indexes() {
            if let Some(idx) = self.indexes.get_mut(def.name) {
                idx.entry((def.extract)(row)).or_default().insert(row.key());
            }
        }
    }

    fn unindex(&mut self, row: &T) {
        for def in T::indexes() {
            if let Some(idx) = self.indexes.get_mut(def.name) {
                let ik = (def.extract)(row);
                if let Some(keys) = idx.get_mut(&ik) {
                    keys.remove(&row.key());
                    if keys.is_empty() {
                        idx.remove(&ik);
                    }
                }
            }
        }
    }
}

impl<T: Record<Key = u32>> Table<T> {
    /// Next unused auto-increment key.
    pub fn next_id(&self) -> u32 {
        self.rows.keys().next_back().map_or(0, |k| k + 1)
    }
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self { rows: self.rows.clone(), indexes: self.indexes.clone() }
    }
}

impl<T: Record> Debug for Table<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("collection", &T::COLLECTION.name())
            .field("rows", &self.rows.len())
            .finish()
    }
}

impl<T: Record> Serialize for Table<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.values())
    }
}

impl<'de, T: Record> Deserialize<'de> for Table<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rows = Vec::<T>::deserialize(deserializer)?;
        Ok(Table::from_rows(rows))
    }
}
