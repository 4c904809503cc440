use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{param_bool, param_season, param_stat_type};
use crate::context::LeagueContext;
use crate::error::Result;
use crate::events::{EventSet, UpdateEvent, View, ViewParams};
use crate::projector::{percentile_ranks, teams_plus, Field, StatType, TeamAttr, TeamFieldSelection, TeamOptions, TeamSeasonField, TeamStatField};
use crate::state::LeagueState;

/// League-wide team stats with each team's percentile in every category.
pub struct TeamStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatsInput {
    pub season: u16,
    pub playoffs: bool,
    pub stat_type: StatType,
}

impl View for TeamStats {
    type Input = TeamStatsInput;

    fn name(&self) -> &'static str {
        "teamStats"
    }

    fn dependencies(&self) -> &'static [UpdateEvent] {
        &[UpdateEvent::GameSim]
    }

    fn get(&self, params: &ViewParams, ctx: &LeagueContext) -> Result<TeamStatsInput> {
        let stat_type = match param_stat_type(params)? {
            // Team totals read best per game unless asked otherwise.
            StatType::Totals if !params.contains_key("statType") => StatType::PerGame,
            other => other,
        };
        Ok(TeamStatsInput {
            season: param_season(params, "season")?.unwrap_or(ctx.season),
            playoffs: param_bool(params, "playoffs")?,
            stat_type,
        })
    }

    fn run_before(&self, input: &TeamStatsInput, _events: &EventSet, state: &LeagueState) -> Result<Option<Value>> {
        let sel = TeamFieldSelection {
            attrs: vec![TeamAttr::Tid, TeamAttr::Abbrev, TeamAttr::Region, TeamAttr::Name],
            seasons: vec![TeamSeasonField::Won, TeamSeasonField::Lost],
            stats: TeamStatField::ALL.to_vec(),
        };
        let opts = TeamOptions { season: Some(input.season), playoffs: input.playoffs, stat_type: input.stat_type };
        let teams = teams_plus(state, &sel, &opts);

        let mut percentiles: Vec<Map<String, Value>> = vec![Map::new(); teams.len()];
        for &field in TeamStatField::ALL {
            let values: Vec<f64> = teams.iter().map(|t| t.stat(field).unwrap_or(0.0)).collect();
            for (i, rank) in percentile_ranks(&values).into_iter().enumerate() {
                percentiles[i].insert(field.name().to_string(), json!(rank));
            }
        }

        let rows: Vec<Value> = teams
            .into_iter()
            .zip(percentiles)
            .map(|(t, pct)| json!({ "tid": t.tid, "attrs": t.attrs, "seasonAttrs": t.season_attrs, "stats": t.stats, "percentiles": pct }))
            .collect();
        Ok(Some(json!({
            "season": input.season,
            "playoffs": input.playoffs,
            "statType": input.stat_type,
            "teams": rows,
        })))
    }
}
