use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::{EventSet, UpdateEvent};
use crate::context::LeagueContext;
use crate::error::{LeagueError, Result};
use crate::state::LeagueState;

/// Raw request parameters, as they arrive from a route or command line.
pub type ViewParams = BTreeMap<String, String>;

/// A data loader for one screen.
///
/// `get` normalizes request parameters into the view's input; `run_before`
/// loads the view model from a committed snapshot and may answer `None` when
/// the events do not change what it shows.
pub trait View: Send + Sync + 'static {
    type Input: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync;

    fn name(&self) -> &'static str;

    fn dependencies(&self) -> &'static [UpdateEvent];

    fn get(&self, params: &ViewParams, ctx: &LeagueContext) -> Result<Self::Input>;

    fn run_before(&self, input: &Self::Input, events: &EventSet, state: &LeagueState) -> Result<Option<Value>>;

    /// Runs after a load has been delivered.
    fn ui_first(&self, _output: &Value) {}
}

/// Object-safe form of [`View`] used by the dispatcher; inputs travel as JSON.
pub trait AnyView: Send + Sync {
    fn name(&self) -> &'static str;
    fn dependencies(&self) -> &'static [UpdateEvent];
    fn parse(&self, params: &ViewParams, ctx: &LeagueContext) -> Result<Value>;
    fn run(&self, input: &Value, events: &EventSet, state: &LeagueState) -> Result<Option<Value>>;
    fn ui_first(&self, output: &Value);
}

impl<V: View> AnyView for V {
    fn name(&self) -> &'static str {
        View::name(self)
    }

    fn dependencies(&self) -> &'static [UpdateEvent] {
        View::dependencies(self)
    }

    fn parse(&self, params: &ViewParams, ctx: &LeagueContext) -> Result<Value> {
        Ok(serde_json::to_value(self.get(params, ctx)?)?)
    }

    fn run(&self, input: &Value, events: &EventSet, state: &LeagueState) -> Result<Option<Value>> {
        let input: V::Input = serde_json::from_value(input.clone())?;
        self.run_before(&input, events, state)
    }

    fn ui_first(&self, output: &Value) {
        View::ui_first(self, output)
    }
}

/// Reads an optional numeric parameter.
pub fn param_u32(params: &ViewParams, key: &str) -> Result<Option<u32>> {
    match params.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| LeagueError::InvalidParameter { name: key.to_string(), value: raw.clone() }),
    }
}
