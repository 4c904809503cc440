use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::fields::{Field, StatType, TeamAttr, TeamSeasonField, TeamStatField};
use super::players::number;
use crate::error::Result;
use crate::models::{StatLine, Team};
use crate::state::LeagueState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamFieldSelection {
    pub attrs: Vec<TeamAttr>,
    pub seasons: Vec<TeamSeasonField>,
    pub stats: Vec<TeamStatField>,
}

impl TeamFieldSelection {
    pub fn parse<S: AsRef<str>>(attrs: &[S], seasons: &[S], stats: &[S]) -> Result<Self> {
        Ok(Self {
            attrs: TeamAttr::parse_all(attrs)?,
            seasons: TeamSeasonField::parse_all(seasons)?,
            stats: TeamStatField::parse_all(stats)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamOptions {
    /// Defaults to the current season.
    pub season: Option<u16>,
    pub playoffs: bool,
    pub stat_type: StatType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamView {
    pub tid: u32,
    pub attrs: BTreeMap<&'static str, Value>,
    pub season_attrs: BTreeMap<&'static str, Value>,
    pub stats: BTreeMap<&'static str, Value>,
}

impl TeamView {
    pub fn stat(&self, field: TeamStatField) -> Option<f64> {
        self.stats.get(field.name()).and_then(Value::as_f64)
    }
}

fn attr_value(t: &Team, attr: TeamAttr) -> Value {
    match attr {
        TeamAttr::Tid => Value::from(t.tid),
        TeamAttr::Region => Value::from(t.region.clone()),
        TeamAttr::Name => Value::from(t.name.clone()),
        TeamAttr::Abbrev => Value::from(t.abbrev.clone()),
        TeamAttr::Cid => Value::from(t.cid),
        TeamAttr::Did => Value::from(t.did),
    }
}

/// Projects a team. Season fields are empty when the team has no row for the
/// season; stats are zero when it has not played.
pub fn project_team(state: &LeagueState, t: &Team, sel: &TeamFieldSelection, opts: &TeamOptions) -> TeamView {
    let season = opts.season.unwrap_or(state.ctx.season);
    let attrs = sel.attrs.iter().map(|&a| (a.name(), attr_value(t, a))).collect();

    let season_attrs = match t.season(season) {
        Some(row) => sel
            .seasons
            .iter()
            .map(|&f| {
                let v = match f {
                    TeamSeasonField::Won => Value::from(row.won),
                    TeamSeasonField::Lost => Value::from(row.lost),
                    TeamSeasonField::Winp => number(row.winp()),
                    TeamSeasonField::PlayoffRoundsWon => Value::from(row.playoff_rounds_won),
                    TeamSeasonField::Hype => number(row.hype),
                    TeamSeasonField::Pop => number(row.pop),
                    TeamSeasonField::Payroll => Value::from(state.payroll(t.tid)),
                };
                (f.name(), v)
            })
            .collect(),
        None => BTreeMap::new(),
    };

    let zero = StatLine::default();
    let (line, opp_pts) = t.stats_row(season, opts.playoffs).map_or((&zero, 0), |r| (&r.line, r.opp_pts));
    let stats = sel.stats.iter().map(|&f| (f.name(), number(f.value(line, opp_pts, opts.stat_type)))).collect();

    TeamView { tid: t.tid, attrs, season_attrs, stats }
}

/// Every team, in tid order.
pub fn teams_plus(state: &LeagueState, sel: &TeamFieldSelection, opts: &TeamOptions) -> Vec<TeamView> {
    state.store.get_all::<Team>().map(|t| project_team(state, t, sel, opts)).collect()
}
