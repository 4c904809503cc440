use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::context::LeagueContext;
use crate::error::{LeagueError, Result};
use crate::events::view::param_u32;
use crate::events::{EventSet, UpdateEvent, View, ViewParams};
use crate::models::{Award, Feat, Owner, Player, PlayerStatsRow};
use crate::player::fuzz_rating;
use crate::projector::{project_player, Field, FieldSelection, ProjectionOptions, StatField, StatType};
use crate::state::LeagueState;

/// One player's page: bio, rating history, season stats, awards and feats.
pub struct PlayerDetail;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetailInput {
    pub pid: u32,
}

const ATTRS: [&str; 13] = [
    "pid", "name", "age", "pos", "tid", "abbrev", "born", "contract", "draft", "injury", "value", "watch", "yearsFreeAgent",
];

impl View for PlayerDetail {
    type Input = PlayerDetailInput;

    fn name(&self) -> &'static str {
        "player"
    }

    fn dependencies(&self) -> &'static [UpdateEvent] {
        &[UpdateEvent::PlayerMovement, UpdateEvent::GameSim, UpdateEvent::Watch]
    }

    fn get(&self, params: &ViewParams, _ctx: &LeagueContext) -> Result<PlayerDetailInput> {
        let pid = param_u32(params, "pid")?
            .ok_or_else(|| LeagueError::InvalidParameter { name: "pid".into(), value: String::new() })?;
        Ok(PlayerDetailInput { pid })
    }

    fn run_before(&self, input: &PlayerDetailInput, _events: &EventSet, state: &LeagueState) -> Result<Option<Value>> {
        let p = state
            .store
            .get::<Player>(&input.pid)
            .ok_or_else(|| LeagueError::NotFound(format!("player {}", input.pid)))?;
        // The user's own players are seen without scouting noise.
        let fuzz = !p.tid.team().map_or(false, |t| state.ctx.is_user_team(t));

        let sel = FieldSelection::parse(&ATTRS, &[], &[])?;
        let bio = project_player(state, p, &sel, &ProjectionOptions::default());

        let ratings: Vec<Value> = p
            .ratings
            .iter()
            .map(|r| {
                let shown = |v: u8| if fuzz { fuzz_rating(v, r.fuzz) } else { v };
                json!({
                    "season": r.season,
                    "age": p.age(r.season),
                    "ovr": shown(r.ovr),
                    "pot": shown(r.pot),
                    "pos": r.pos,
                    "skills": r.skills,
                })
            })
            .collect();

        let mut rows: Vec<&PlayerStatsRow> = state.store.stats_rows_for(p.pid);
        rows.sort_by_key(|r| (r.playoffs, r.season));
        let fields = StatField::ALL;
        let per_game = |row: &PlayerStatsRow| -> Value {
            let stats: serde_json::Map<String, Value> = fields
                .iter()
                .map(|f| (f.name().to_string(), json!(f.value(&row.line, StatType::PerGame))))
                .collect();
            json!({
                "season": row.season,
                "playoffs": row.playoffs,
                "abbrev": state.team_abbrev(Owner::Team(row.tid)),
                "stats": stats,
            })
        };
        let stats: Vec<Value> = rows.iter().map(|r| per_game(*r)).collect();

        let career_opts = ProjectionOptions { stat_type: StatType::PerGame, ..Default::default() };
        let career_sel = FieldSelection { stats: StatField::ALL.to_vec(), ..Default::default() };
        let career = project_player(state, p, &career_sel, &career_opts).stats;

        let awards: Vec<&Award> = state.store.get_all::<Award>().filter(|a| a.pid == Some(p.pid)).collect();
        let feats: Vec<&Feat> = state.store.index_get::<Feat>("pid", &[p.pid as i64])?;

        Ok(Some(json!({
            "pid": p.pid,
            "bio": bio.attrs,
            "retiredYear": p.retired_year,
            "ratings": ratings,
            "stats": stats,
            "careerStats": career,
            "awards": awards,
            "feats": feats,
        })))
    }
}
