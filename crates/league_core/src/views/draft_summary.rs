use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::param_season;
use crate::context::LeagueContext;
use crate::error::Result;
use crate::events::{EventSet, UpdateEvent, View, ViewParams};
use crate::models::{Owner, Phase, Player, StatLine};
use crate::projector::{summed_line, ProjectionOptions, StatField, StatType};
use crate::state::LeagueState;

/// Every pick of one draft, with ratings then and now and career stats.
pub struct DraftSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSummaryInput {
    pub season: u16,
}

impl View for DraftSummary {
    type Input = DraftSummaryInput;

    fn name(&self) -> &'static str {
        "draftSummary"
    }

    fn dependencies(&self) -> &'static [UpdateEvent] {
        &[UpdateEvent::PlayerMovement, UpdateEvent::DbChange]
    }

    /// Defaults to the latest completed draft.
    fn get(&self, params: &ViewParams, ctx: &LeagueContext) -> Result<DraftSummaryInput> {
        let latest = if ctx.phase >= Phase::Draft { ctx.season } else { ctx.season.saturating_sub(1) };
        Ok(DraftSummaryInput { season: param_season(params, "season")?.unwrap_or(latest) })
    }

    fn run_before(&self, input: &DraftSummaryInput, _events: &EventSet, state: &LeagueState) -> Result<Option<Value>> {
        let mut picks: Vec<&Player> = state
            .store
            .index_get::<Player>("draft.year", &[input.season as i64])?
            .into_iter()
            .filter(|p| p.draft.was_drafted())
            .collect();
        picks.sort_by_key(|p| (p.draft.round, p.draft.pick, p.pid));

        let career = ProjectionOptions::default();
        let per_game = |line: &StatLine, f: StatField| f.value(line, StatType::PerGame);
        let players: Vec<Value> = picks
            .into_iter()
            .map(|p| {
                let at_draft = p.rating(input.season).or_else(|| p.ratings.first());
                let line = summed_line(state, p.pid, &career).unwrap_or_default();
                json!({
                    "pid": p.pid,
                    "name": p.name,
                    "pos": p.pos,
                    "round": p.draft.round,
                    "pick": p.draft.pick,
                    "draftAbbrev": p.draft.tid.map(|t| state.team_abbrev(Owner::Team(t))),
                    "currentAbbrev": state.team_abbrev(p.tid),
                    "tid": p.tid,
                    "age": p.age(input.season),
                    "draftOvr": at_draft.map(|r| r.ovr),
                    "draftPot": at_draft.map(|r| r.pot),
                    "currentOvr": p.ovr(),
                    "currentPot": p.pot(),
                    "careerStats": {
                        "gp": line.gp,
                        "min": per_game(&line, StatField::Min),
                        "pts": per_game(&line, StatField::Pts),
                        "trb": per_game(&line, StatField::Trb),
                        "ast": per_game(&line, StatField::Ast),
                    },
                })
            })
            .collect();
        Ok(Some(json!({ "season": input.season, "players": players })))
    }
}
