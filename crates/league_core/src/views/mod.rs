//! Screen data loaders. Each view turns request parameters into a typed
//! input and loads a JSON view model from a committed league snapshot.

pub mod draft_scouting;
pub mod draft_summary;
pub mod leaders;
pub mod player;
pub mod player_feats;
pub mod team_stats;


pub use draft_scouting::DraftScouting;
pub use draft_summary::DraftSummary;
pub use leaders::Leaders;
pub use player::PlayerDetail;
pub use player_feats::PlayerFeats;
pub use team_stats::TeamStats;

use crate::error::{LeagueError, Result};
use crate::events::{AnyView, ViewParams};
use crate::projector::StatType;

pub const VIEW_NAMES: [&str; 6] = ["draftScouting", "draftSummary", "leaders", "player", "playerFeats", "teamStats"];

/// Looks a view up by its route name.
pub fn by_name(name: &str) -> Result<Box<dyn AnyView>> {
    let view: Box<dyn AnyView> = match name {
        "draftScouting" => Box::new(DraftScouting),
        "draftSummary" => Box::new(DraftSummary),
        "leaders" => Box::new(Leaders),
        "player" => Box::new(PlayerDetail),
        "playerFeats" => Box::new(PlayerFeats),
        "teamStats" => Box::new(TeamStats),
        other => return Err(LeagueError::NotFound(format!("view {}", other))),
    };
    Ok(view)
}

fn invalid(key: &str, raw: &str) -> LeagueError {
    LeagueError::InvalidParameter { name: key.to_string(), value: raw.to_string() }
}

pub(crate) fn param_season(params: &ViewParams, key: &str) -> Result<Option<u16>> {
    match crate::events::view::param_u32(params, key)? {
        None => Ok(None),
        Some(v) => u16::try_from(v).map(Some).map_err(|_| invalid(key, &v.to_string())),
    }
}

pub(crate) fn param_bool(params: &ViewParams, key: &str) -> Result<bool> {
    match params.get(key).map(String::as_str) {
        None | Some("0") | Some("false") | Some("regularSeason") => Ok(false),
        Some("1") | Some("true") | Some("playoffs") => Ok(true),
        Some(raw) => Err(invalid(key, raw)),
    }
}

pub(crate) fn param_stat_type(params: &ViewParams) -> Result<StatType> {
    match params.get("statType").map(String::as_str) {
        None | Some("totals") => Ok(StatType::Totals),
        Some("perGame") => Ok(StatType::PerGame),
        Some("per36") => Ok(StatType::Per36),
        Some(raw) => Err(invalid("statType", raw)),
    }
}
