use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::param_season;
use crate::context::LeagueContext;
use crate::error::Result;
use crate::events::view::param_u32;
use crate::events::{EventSet, UpdateEvent, View, ViewParams};
use crate::models::{Feat, Owner};
use crate::state::LeagueState;

/// Statistical feats, newest first, optionally for one team or season.
pub struct PlayerFeats;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerFeatsInput {
    pub tid: Option<u32>,
    pub season: Option<u16>,
}

impl View for PlayerFeats {
    type Input = PlayerFeatsInput;

    fn name(&self) -> &'static str {
        "playerFeats"
    }

    fn dependencies(&self) -> &'static [UpdateEvent] {
        &[UpdateEvent::GameSim]
    }

    fn get(&self, params: &ViewParams, _ctx: &LeagueContext) -> Result<PlayerFeatsInput> {
        Ok(PlayerFeatsInput { tid: param_u32(params, "tid")?, season: param_season(params, "season")? })
    }

    fn run_before(&self, input: &PlayerFeatsInput, _events: &EventSet, state: &LeagueState) -> Result<Option<Value>> {
        let mut feats: Vec<&Feat> = state
            .store
            .get_all::<Feat>()
            .filter(|f| input.tid.map_or(true, |t| f.tid == t))
            .filter(|f| input.season.map_or(true, |s| f.season == s))
            .collect();
        feats.sort_by(|a, b| b.feat_id.cmp(&a.feat_id));

        let rows: Vec<Value> = feats
            .into_iter()
            .map(|f| {
                json!({
                    "fid": f.fid,
                    "pid": f.pid,
                    "name": f.name,
                    "season": f.season,
                    "playoffs": f.playoffs,
                    "abbrev": state.team_abbrev(Owner::Team(f.tid)),
                    "oppAbbrev": state.team_abbrev(Owner::Team(f.opp_tid)),
                    "result": if f.won { "W" } else { "L" },
                    "score": f.score,
                    "stats": f.line,
                })
            })
            .collect();
        Ok(Some(json!({ "tid": input.tid, "season": input.season, "feats": rows })))
    }
}
