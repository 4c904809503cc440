//! Update events and the view dispatcher.
//!
//! Every committed mutation produces an [`EventSet`]. The [`Dispatcher`]
//! re-runs only the registered views whose dependencies intersect it.

pub mod dispatcher;
pub mod view;

pub use dispatcher::{Dispatcher, LoadTicket, ViewId, ViewUpdate};
pub use view::{AnyView, View, ViewParams};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateEvent {
    /// A view's first load; always runs it.
    FirstRun,
    PlayerMovement,
    GameSim,
    DbChange,
    ClearWatchList,
    NewPhase,
    GameAttributes,
    Watch,
}

/// The events produced by one committed mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventSet(BTreeSet<UpdateEvent>);

impl EventSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(events: impl IntoIterator<Item = UpdateEvent>) -> Self {
        Self(events.into_iter().collect())
    }

    pub fn insert(&mut self, event: UpdateEvent) {
        self.0.insert(event);
    }

    pub fn extend(&mut self, other: EventSet) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, event: UpdateEvent) -> bool {
        self.0.contains(&event)
    }

    pub fn intersects(&self, deps: &[UpdateEvent]) -> bool {
        deps.iter().any(|e| self.0.contains(e))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = UpdateEvent> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<UpdateEvent> for EventSet {
    fn from_iter<I: IntoIterator<Item = UpdateEvent>>(iter: I) -> Self {
        Self::of(iter)
    }
}
