use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{param_bool, param_season};
use crate::context::LeagueContext;
use crate::error::Result;
use crate::events::{EventSet, UpdateEvent, View, ViewParams};
use crate::models::Team;
use crate::projector::{
    league_players, players_plus, Field, FieldSelection, PlayerAttr, PlayerView, ProjectionOptions, StatField, StatType,
};
use crate::state::LeagueState;

const TOP: usize = 10;

const CATEGORIES: [(StatField, &str); 6] = [
    (StatField::Pts, "Points Per Game"),
    (StatField::Trb, "Rebounds Per Game"),
    (StatField::Ast, "Assists Per Game"),
    (StatField::Stl, "Steals Per Game"),
    (StatField::Blk, "Blocks Per Game"),
    (StatField::Fgp, "Field Goal Percentage"),
];

/// Per-game league leaders for a season.
pub struct Leaders;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadersInput {
    pub season: u16,
    pub playoffs: bool,
}

/// Games a player must have appeared in to qualify: half of the most games
/// any team has played, at least one.
fn min_games(state: &LeagueState, input: &LeadersInput) -> u32 {
    let most = state
        .store
        .get_all::<Team>()
        .map(|t| t.stats_row(input.season, input.playoffs).map_or(0, |r| r.line.gp))
        .max()
        .unwrap_or(0);
    most.div_ceil(2).max(1)
}

impl View for Leaders {
    type Input = LeadersInput;

    fn name(&self) -> &'static str {
        "leaders"
    }

    fn dependencies(&self) -> &'static [UpdateEvent] {
        &[UpdateEvent::GameSim]
    }

    fn get(&self, params: &ViewParams, ctx: &LeagueContext) -> Result<LeadersInput> {
        Ok(LeadersInput {
            season: param_season(params, "season")?.unwrap_or(ctx.season),
            playoffs: param_bool(params, "playoffs")?,
        })
    }

    fn run_before(&self, input: &LeadersInput, _events: &EventSet, state: &LeagueState) -> Result<Option<Value>> {
        let sel = FieldSelection {
            attrs: vec![PlayerAttr::Pid, PlayerAttr::Name, PlayerAttr::Abbrev],
            ratings: Vec::new(),
            stats: [StatField::Gp].into_iter().chain(CATEGORIES.iter().map(|c| c.0)).collect(),
        };
        let opts = ProjectionOptions {
            season: Some(input.season),
            playoffs: input.playoffs,
            stat_type: StatType::PerGame,
            ..Default::default()
        };
        let min_gp = min_games(state, input) as f64;
        let qualified: Vec<_> = players_plus(state, league_players(state), &sel, &opts)
            .into_iter()
            .filter(|v| v.stat(StatField::Gp).unwrap_or(0.0) >= min_gp)
            .collect();

        let categories: Vec<Value> = CATEGORIES
            .iter()
            .map(|&(field, title)| {
                let mut ranked: Vec<(f64, &PlayerView)> =
                    qualified.iter().map(|v| (v.stat(field).unwrap_or(0.0), v)).collect();
                ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.pid.cmp(&b.1.pid)));
                let leaders: Vec<Value> = ranked
                    .into_iter()
                    .take(TOP)
                    .map(|(value, v)| json!({ "pid": v.pid, "name": v.attrs.get("name"), "abbrev": v.attrs.get("abbrev"), "value": value }))
                    .collect();
                json!({ "name": field.name(), "title": title, "leaders": leaders })
            })
            .collect();
        Ok(Some(json!({ "season": input.season, "playoffs": input.playoffs, "categories": categories })))
    }
}
