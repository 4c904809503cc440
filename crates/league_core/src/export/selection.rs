use std::collections::BTreeSet;

use crate::error::Result;
use crate::store::Collection;

pub const STATS_WITHOUT_PLAYERS: &str = "Cannot export player stats without players";

/// The collections a user picked for export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSelection {
    collections: BTreeSet<Collection>,
}

impl ExportSelection {
    pub fn new(collections: impl IntoIterator<Item = Collection>) -> Self {
        Self { collections: collections.into_iter().collect() }
    }

    pub fn all() -> Self {
        Self::new(Collection::ALL)
    }

    /// Parses collection names such as `"players"` or `"playerStats"`.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let collections = names.iter().map(|n| n.as_ref().parse::<Collection>()).collect::<Result<Vec<_>>>()?;
        Ok(Self::new(collections))
    }

    pub fn contains(&self, collection: Collection) -> bool {
        self.collections.contains(&collection)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// A message to show next to the picker, if the selection has a problem.
    /// Problems never block the export; [`Self::exported`] leaves out what
    /// cannot be written.
    pub fn validate(&self) -> Option<&'static str> {
        (self.contains(Collection::PlayerStats) && !self.contains(Collection::Players)).then_some(STATS_WITHOUT_PLAYERS)
    }

    /// Collections that will actually be written, in name order.
    pub fn exported(&self) -> Vec<Collection> {
        let stats_ok = self.contains(Collection::Players);
        let mut out: Vec<Collection> = self
            .collections
            .iter()
            .copied()
            .filter(|&c| c != Collection::PlayerStats || stats_ok)
            .collect();
        out.sort_by_key(|c| c.name());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_need_players() {
        let sel = ExportSelection::parse(&["playerStats", "teams"]).unwrap();
        assert_eq!(sel.validate(), Some(STATS_WITHOUT_PLAYERS));
        assert_eq!(sel.exported(), vec![Collection::Teams]);

        let sel = ExportSelection::parse(&["playerStats", "players"]).unwrap();
        assert_eq!(sel.validate(), None);
        assert_eq!(sel.exported(), vec![Collection::PlayerStats, Collection::Players]);
    }

    #[test]
    fn test_unknown_collection_is_an_error() {
        assert!(ExportSelection::parse(&["players", "boxScores"]).is_err());
    }
}
