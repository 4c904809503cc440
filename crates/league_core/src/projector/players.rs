use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::fields::{Field, PlayerAttr, RatingField, StatField, StatType};
use crate::error::Result;
use crate::models::{Owner, Player, RatingSnapshot, StatLine};
use crate::player::fuzz_rating;
use crate::state::LeagueState;

/// Which columns to project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSelection {
    pub attrs: Vec<PlayerAttr>,
    pub ratings: Vec<RatingField>,
    pub stats: Vec<StatField>,
}

impl FieldSelection {
    /// Resolves string field names; any unknown name fails the whole call.
    pub fn parse<S: AsRef<str>>(attrs: &[S], ratings: &[S], stats: &[S]) -> Result<Self> {
        Ok(Self {
            attrs: PlayerAttr::parse_all(attrs)?,
            ratings: RatingField::parse_all(ratings)?,
            stats: StatField::parse_all(stats)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionOptions {
    /// `None` means the latest ratings and career stats.
    pub season: Option<u16>,
    /// Only stat rows recorded for this team.
    pub tid: Option<u32>,
    pub playoffs: bool,
    /// Include players without stats, with zeroed lines.
    pub show_no_stats: bool,
    /// Include rookies drafted in `season` even without stats.
    pub show_rookies: bool,
    pub fuzz: bool,
    pub stat_type: StatType,
}

/// A projected player. Maps are keyed by field name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pid: u32,
    pub attrs: BTreeMap<&'static str, Value>,
    pub ratings: BTreeMap<&'static str, Value>,
    pub stats: BTreeMap<&'static str, Value>,
}

impl PlayerView {
    pub fn stat(&self, field: StatField) -> Option<f64> {
        self.stats.get(field.name()).and_then(Value::as_f64)
    }

    pub fn rating(&self, field: RatingField) -> Option<f64> {
        self.ratings.get(field.name()).and_then(Value::as_f64)
    }
}

/// Whole numbers serialize as integers, everything else as floats.
pub(crate) fn number(v: f64) -> Value {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Value::from(v as i64)
    } else {
        serde_json::Number::from_f64(v).map_or(Value::from(0), Value::Number)
    }
}

fn attr_value(state: &LeagueState, p: &Player, attr: PlayerAttr, season: u16) -> Value {
    let to_value = |v: serde_json::Result<Value>| v.unwrap_or(Value::Null);
    match attr {
        PlayerAttr::Pid => Value::from(p.pid),
        PlayerAttr::Name => Value::from(p.name.clone()),
        PlayerAttr::Age => Value::from(p.age(season)),
        PlayerAttr::Pos => Value::from(p.pos.clone()),
        PlayerAttr::Tid => Value::from(p.tid.tid()),
        PlayerAttr::Abbrev => Value::from(state.team_abbrev(p.tid)),
        PlayerAttr::Contract => to_value(serde_json::to_value(p.contract)),
        PlayerAttr::ContractDesired => to_value(serde_json::to_value(p.contract_desired)),
        PlayerAttr::Draft => to_value(serde_json::to_value(&p.draft)),
        PlayerAttr::Injury => to_value(serde_json::to_value(&p.injury)),
        PlayerAttr::Value => number(p.value),
        PlayerAttr::ValueNoPot => number(p.value_no_pot),
        PlayerAttr::ValueFuzz => number(p.value_fuzz),
        PlayerAttr::Born => to_value(serde_json::to_value(&p.born)),
        PlayerAttr::YearsFreeAgent => Value::from(p.years_free_agent),
        PlayerAttr::Watch => Value::from(p.watch),
    }
}

fn rating_value(r: &RatingSnapshot, field: RatingField, fuzz: bool) -> Value {
    let shown = |v: u8| if fuzz { fuzz_rating(v, r.fuzz) } else { v };
    match field {
        RatingField::Season => Value::from(r.season),
        RatingField::Ovr => Value::from(shown(r.ovr)),
        RatingField::Pot => Value::from(shown(r.pot)),
        RatingField::Pos => Value::from(r.pos.clone()),
        RatingField::Skills => Value::from(r.skills.clone()),
        other => match other.skill() {
            Some(skill) => Value::from(shown(r.get(skill))),
            None => Value::Null,
        },
    }
}

/// Sum of the stat rows matching `opts`, or `None` when there are none.
pub fn summed_line(state: &LeagueState, pid: u32, opts: &ProjectionOptions) -> Option<StatLine> {
    let rows: Vec<_> = state
        .store
        .stats_rows_for(pid)
        .into_iter()
        .filter(|row| row.playoffs == opts.playoffs)
        .filter(|row| opts.season.map_or(true, |s| row.season == s))
        .filter(|row| opts.tid.map_or(true, |t| row.tid == t))
        .collect();
    if rows.is_empty() {
        return None;
    }
    let mut line = StatLine::default();
    for row in rows {
        line.add(&row.line);
    }
    Some(line)
}

fn stat_map(line: &StatLine, fields: &[StatField], stat_type: StatType) -> BTreeMap<&'static str, Value> {
    fields.iter().map(|&f| (f.name(), number(f.value(line, stat_type)))).collect()
}

/// Projects one player and reports whether it passes the stats filter.
fn project(state: &LeagueState, p: &Player, sel: &FieldSelection, opts: &ProjectionOptions) -> (PlayerView, bool) {
    let season = opts.season.unwrap_or(state.ctx.season);

    let attrs = sel.attrs.iter().map(|&a| (a.name(), attr_value(state, p, a, season))).collect();

    let snapshot = match opts.season {
        Some(s) => p.rating(s),
        None => p.latest_rating(),
    };
    let ratings = match snapshot {
        Some(r) => sel.ratings.iter().map(|&f| (f.name(), rating_value(r, f, opts.fuzz))).collect(),
        None => BTreeMap::new(),
    };

    let (stats, included) = if sel.stats.is_empty() {
        (BTreeMap::new(), true)
    } else {
        match summed_line(state, p.pid, opts) {
            Some(line) => (stat_map(&line, &sel.stats, opts.stat_type), true),
            None => {
                let rookie = opts.show_rookies && p.draft.year == season && p.draft.was_drafted();
                if opts.show_no_stats || rookie {
                    (stat_map(&StatLine::default(), &sel.stats, opts.stat_type), true)
                } else {
                    (BTreeMap::new(), false)
                }
            }
        }
    };

    (PlayerView { pid: p.pid, attrs, ratings, stats }, included)
}

/// One player, always returned. The stats map is empty when the player has
/// no matching rows and neither inclusion flag applies.
pub fn project_player(state: &LeagueState, p: &Player, sel: &FieldSelection, opts: &ProjectionOptions) -> PlayerView {
    project(state, p, sel, opts).0
}

/// Projects `players` in order, dropping those filtered out by the stats
/// rules of [`project_player`].
pub fn players_plus<'a>(
    state: &LeagueState,
    players: impl IntoIterator<Item = &'a Player>,
    sel: &FieldSelection,
    opts: &ProjectionOptions,
) -> Vec<PlayerView> {
    players
        .into_iter()
        .filter_map(|p| {
            let (view, included) = project(state, p, sel, opts);
            included.then_some(view)
        })
        .collect()
}

/// Players to consider for a season-scoped list: everyone who was active in
/// the league, including retirees.
pub fn league_players(state: &LeagueState) -> Vec<&Player> {
    state
        .store
        .get_all::<Player>()
        .filter(|p| !matches!(p.tid, Owner::Undrafted(_) | Owner::FantasyDraftTemp))
        .collect()
}
