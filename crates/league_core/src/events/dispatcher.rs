use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use super::view::{AnyView, View, ViewParams};
use super::{EventSet, UpdateEvent};
use crate::error::{LeagueError, Result};
use crate::state::LeagueState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

/// Identifies one load of one view. Only the newest ticket of a view may
/// deliver its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub id: ViewId,
    generation: u64,
}

/// A delivered view model.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub id: ViewId,
    pub name: &'static str,
    pub output: Value,
}

struct Registration {
    view: Box<dyn AnyView>,
    input: Value,
    generation: u64,
    output: Option<Value>,
    /// Store revision the current output was loaded from.
    revision: Option<u64>,
}

#[derive(Default)]
pub struct Dispatcher {
    views: BTreeMap<ViewId, Registration>,
    next_id: u64,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("views", &self.views.len()).finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `view` with `params` and runs its first load against `state`.
    pub fn register<V: View>(&mut self, view: V, params: &ViewParams, state: &LeagueState) -> Result<ViewId> {
        self.register_boxed(Box::new(view), params, state)
    }

    pub fn register_boxed(&mut self, view: Box<dyn AnyView>, params: &ViewParams, state: &LeagueState) -> Result<ViewId> {
        let input = view.parse(params, &state.ctx)?;
        let id = ViewId(self.next_id);
        self.next_id += 1;
        self.views.insert(id, Registration { view, input, generation: 0, output: None, revision: None });
        // A view whose first load fails is never registered.
        if let Err(err) = self.load(id, &EventSet::of([UpdateEvent::FirstRun]), state) {
            self.views.remove(&id);
            return Err(err);
        }
        Ok(id)
    }

    /// Tears a view down. Loads still in flight for it are discarded.
    pub fn unregister(&mut self, id: ViewId) -> bool {
        self.views.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn output(&self, id: ViewId) -> Option<&Value> {
        self.views.get(&id).and_then(|r| r.output.as_ref())
    }

    /// Store revision the view's current output reflects.
    pub fn revision(&self, id: ViewId) -> Option<u64> {
        self.views.get(&id).and_then(|r| r.revision)
    }

    /// New request parameters. A changed input reloads the view as a first run.
    pub fn set_params(&mut self, id: ViewId, params: &ViewParams, state: &LeagueState) -> Result<Option<ViewUpdate>> {
        let reg = self.views.get_mut(&id).ok_or_else(|| LeagueError::NotFound(format!("view {:?}", id)))?;
        let input = reg.view.parse(params, &state.ctx)?;
        if input == reg.input && reg.output.is_some() {
            return Ok(None);
        }
        reg.input = input;
        self.load(id, &EventSet::of([UpdateEvent::FirstRun]), state)
    }

    /// Starts a load, superseding any earlier one for the same view.
    pub fn begin_load(&mut self, id: ViewId) -> Option<LoadTicket> {
        let reg = self.views.get_mut(&id)?;
        reg.generation += 1;
        Some(LoadTicket { id, generation: reg.generation })
    }

    /// Runs the loader for `ticket` against `state` without delivering.
    pub fn run_load(&self, ticket: LoadTicket, events: &EventSet, state: &LeagueState) -> Result<Option<Value>> {
        let reg = self.views.get(&ticket.id).ok_or_else(|| LeagueError::NotFound(format!("view {:?}", ticket.id)))?;
        reg.view.run(&reg.input, events, state)
    }

    /// Delivers a finished load. Returns `None` when the ticket was
    /// superseded, the view is gone, or the loader reported no change.
    pub fn complete_load(&mut self, ticket: LoadTicket, output: Option<Value>, revision: u64) -> Option<ViewUpdate> {
        let reg = self.views.get_mut(&ticket.id)?;
        if reg.generation != ticket.generation {
            debug!(view = reg.view.name(), "discarding superseded load");
            return None;
        }
        let output = output?;
        reg.view.ui_first(&output);
        reg.output = Some(output.clone());
        reg.revision = Some(revision);
        Some(ViewUpdate { id: ticket.id, name: reg.view.name(), output })
    }

    fn load(&mut self, id: ViewId, events: &EventSet, state: &LeagueState) -> Result<Option<ViewUpdate>> {
        let Some(ticket) = self.begin_load(id) else {
            return Ok(None);
        };
        let output = self.run_load(ticket, events, state)?;
        Ok(self.complete_load(ticket, output, state.store.revision()))
    }

    /// Re-runs every view whose dependencies intersect `events`, all against
    /// the same `state`. A failing loader is logged and skipped.
    pub fn dispatch(&mut self, events: &EventSet, state: &LeagueState) -> Vec<ViewUpdate> {
        let ids: Vec<ViewId> = self
            .views
            .iter()
            .filter(|(_, r)| events.contains(UpdateEvent::FirstRun) || events.intersects(r.view.dependencies()))
            .map(|(&id, _)| id)
            .collect();
        let mut updates = Vec::new();
        for id in ids {
            match self.load(id, events, state) {
                Ok(Some(update)) => updates.push(update),
                Ok(None) => {}
                Err(err) => debug!(?id, %err, "view load failed"),
            }
        }
        debug!(views = updates.len(), ?events, "dispatched update");
        updates
    }
}
