use serde_json::{json, Value};

use crate::context::LeagueContext;
use crate::error::Result;
use crate::events::{EventSet, UpdateEvent, View, ViewParams};
use crate::market::ranked_class;
use crate::models::Owner;
use crate::projector::{players_plus, FieldSelection, ProjectionOptions};
use crate::state::LeagueState;

/// The three upcoming draft classes as the user's scouts see them.
pub struct DraftScouting;

impl View for DraftScouting {
    type Input = ();

    fn name(&self) -> &'static str {
        "draftScouting"
    }

    fn dependencies(&self) -> &'static [UpdateEvent] {
        &[UpdateEvent::PlayerMovement, UpdateEvent::NewPhase, UpdateEvent::DbChange]
    }

    fn get(&self, _params: &ViewParams, _ctx: &LeagueContext) -> Result<()> {
        Ok(())
    }

    fn run_before(&self, _input: &(), _events: &EventSet, state: &LeagueState) -> Result<Option<Value>> {
        let sel = FieldSelection::parse(&["pid", "name", "age", "valueFuzz", "watch"], &["ovr", "pot", "skills", "pos"], &[])?;
        let opts = ProjectionOptions { fuzz: true, ..Default::default() };

        let mut classes = Vec::new();
        for class in Owner::draft_classes() {
            let prospects = ranked_class(&state.store, class);
            let season = prospects.first().map(|p| p.draft.year);
            let players: Vec<Value> = players_plus(state, prospects, &sel, &opts)
                .into_iter()
                .enumerate()
                .map(|(i, view)| {
                    let mut row = json!({ "rank": i + 1 });
                    row["pid"] = json!(view.pid);
                    row["attrs"] = json!(view.attrs);
                    row["ratings"] = json!(view.ratings);
                    row
                })
                .collect();
            classes.push(json!({ "season": season, "players": players }));
        }
        Ok(Some(json!({ "classes": classes })))
    }
}
