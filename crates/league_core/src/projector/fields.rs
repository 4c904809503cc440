//! Field names accepted by the projector, and the registry that validates
//! string names coming from callers.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use crate::error::{LeagueError, Result};
use crate::models::{pct, Skill, StatLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Attribute,
    Rating,
    Stat,
    TeamAttribute,
    TeamSeason,
    TeamStat,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            FieldKind::Attribute => "attribute",
            FieldKind::Rating => "rating",
            FieldKind::Stat => "stat",
            FieldKind::TeamAttribute => "team attribute",
            FieldKind::TeamSeason => "team season",
            FieldKind::TeamStat => "team stat",
        };
        f.write_str(name)
    }
}

/// A typed field with a stable external name.
pub trait Field: Copy + Sized + 'static {
    const KIND: FieldKind;
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Looks `name` up in the registry.
    fn parse(name: &str) -> Result<Self> {
        REGISTRY
            .get(&(Self::KIND, name))
            .map(|&idx| Self::ALL[idx])
            .ok_or_else(|| LeagueError::UnknownField { kind: Self::KIND, name: name.to_string() })
    }

    fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>> {
        names.iter().map(|n| Self::parse(n.as_ref())).collect()
    }
}

macro_rules! field_enum {
    ($(#[$meta:meta])* $name:ident, $kind:expr, { $($variant:ident => $key:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl Field for $name {
            const KIND: FieldKind = $kind;
            const ALL: &'static [Self] = &[$($name::$variant),*];

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $key),*
                }
            }
        }
    };
}

field_enum!(PlayerAttr, FieldKind::Attribute, {
    Pid => "pid",
    Name => "name",
    Age => "age",
    Pos => "pos",
    Tid => "tid",
    Abbrev => "abbrev",
    Contract => "contract",
    ContractDesired => "contractDesired",
    Draft => "draft",
    Injury => "injury",
    Value => "value",
    ValueNoPot => "valueNoPot",
    ValueFuzz => "valueFuzz",
    Born => "born",
    YearsFreeAgent => "yearsFreeAgent",
    Watch => "watch",
});

field_enum!(RatingField, FieldKind::Rating, {
    Season => "season",
    Ovr => "ovr",
    Pot => "pot",
    Pos => "pos",
    Skills => "skills",
    Hgt => "hgt",
    Stre => "stre",
    Spd => "spd",
    Jmp => "jmp",
    Endu => "endu",
    Ins => "ins",
    Dnk => "dnk",
    Ft => "ft",
    Fg => "fg",
    Tp => "tp",
    Oiq => "oiq",
    Diq => "diq",
    Drb => "drb",
    Pss => "pss",
    Reb => "reb",
});

impl RatingField {
    pub fn skill(self) -> Option<Skill> {
        Skill::from_key(self.name())
    }
}

field_enum!(
    /// Player stat columns.
    StatField, FieldKind::Stat, {
    Gp => "gp",
    Gs => "gs",
    Min => "min",
    Fg => "fg",
    Fga => "fga",
    Fgp => "fgp",
    Tp => "tp",
    Tpa => "tpa",
    Tpp => "tpp",
    Ft => "ft",
    Fta => "fta",
    Ftp => "ftp",
    Orb => "orb",
    Drb => "drb",
    Trb => "trb",
    Ast => "ast",
    Tov => "tov",
    Stl => "stl",
    Blk => "blk",
    Pf => "pf",
    Pts => "pts",
});

field_enum!(TeamAttr, FieldKind::TeamAttribute, {
    Tid => "tid",
    Region => "region",
    Name => "name",
    Abbrev => "abbrev",
    Cid => "cid",
    Did => "did",
});

field_enum!(TeamSeasonField, FieldKind::TeamSeason, {
    Won => "won",
    Lost => "lost",
    Winp => "winp",
    PlayoffRoundsWon => "playoffRoundsWon",
    Hype => "hype",
    Pop => "pop",
    Payroll => "payroll",
});

field_enum!(TeamStatField, FieldKind::TeamStat, {
    Gp => "gp",
    Fg => "fg",
    Fga => "fga",
    Fgp => "fgp",
    Tp => "tp",
    Tpa => "tpa",
    Tpp => "tpp",
    Ft => "ft",
    Fta => "fta",
    Ftp => "ftp",
    Orb => "orb",
    Drb => "drb",
    Trb => "trb",
    Ast => "ast",
    Tov => "tov",
    Stl => "stl",
    Blk => "blk",
    Pf => "pf",
    Pts => "pts",
    OppPts => "oppPts",
    Diff => "diff",
});

fn register<F: Field>(map: &mut HashMap<(FieldKind, &'static str), usize>) {
    for (idx, field) in F::ALL.iter().enumerate() {
        map.insert((F::KIND, field.name()), idx);
    }
}

static REGISTRY: Lazy<HashMap<(FieldKind, &'static str), usize>> = Lazy::new(|| {
    let mut map = HashMap::new();
    register::<PlayerAttr>(&mut map);
    register::<RatingField>(&mut map);
    register::<StatField>(&mut map);
    register::<TeamAttr>(&mut map);
    register::<TeamSeasonField>(&mut map);
    register::<TeamStatField>(&mut map);
    map
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatType {
    #[default]
    Totals,
    PerGame,
    Per36,
}

/// Scales a counting stat for `stat_type`. Zero games or minutes give zero.
pub fn scale(total: f64, line: &StatLine, stat_type: StatType) -> f64 {
    match stat_type {
        StatType::Totals => total,
        StatType::PerGame if line.gp == 0 => 0.0,
        StatType::PerGame => total / line.gp as f64,
        StatType::Per36 if line.min <= 0.0 => 0.0,
        StatType::Per36 => total * 36.0 / line.min,
    }
}

impl StatField {
    pub fn value(self, line: &StatLine, stat_type: StatType) -> f64 {
        let count = |v: u32| scale(v as f64, line, stat_type);
        match self {
            StatField::Gp => line.gp as f64,
            StatField::Gs => line.gs as f64,
            // Per-36 minutes would always read 36; show minutes per game.
            StatField::Min => match stat_type {
                StatType::Totals => line.min,
                _ => scale(line.min, line, StatType::PerGame),
            },
            StatField::Fg => count(line.fg),
            StatField::Fga => count(line.fga),
            StatField::Fgp => pct(line.fg, line.fga),
            StatField::Tp => count(line.tp),
            StatField::Tpa => count(line.tpa),
            StatField::Tpp => pct(line.tp, line.tpa),
            StatField::Ft => count(line.ft),
            StatField::Fta => count(line.fta),
            StatField::Ftp => pct(line.ft, line.fta),
            StatField::Orb => count(line.orb),
            StatField::Drb => count(line.drb),
            StatField::Trb => count(line.trb()),
            StatField::Ast => count(line.ast),
            StatField::Tov => count(line.tov),
            StatField::Stl => count(line.stl),
            StatField::Blk => count(line.blk),
            StatField::Pf => count(line.pf),
            StatField::Pts => count(line.pts),
        }
    }
}

impl TeamStatField {
    pub fn value(self, line: &StatLine, opp_pts: u32, stat_type: StatType) -> f64 {
        let count = |v: f64| scale(v, line, stat_type);
        match self {
            TeamStatField::Gp => line.gp as f64,
            TeamStatField::Fg => count(line.fg as f64),
            TeamStatField::Fga => count(line.fga as f64),
            TeamStatField::Fgp => pct(line.fg, line.fga),
            TeamStatField::Tp => count(line.tp as f64),
            TeamStatField::Tpa => count(line.tpa as f64),
            TeamStatField::Tpp => pct(line.tp, line.tpa),
            TeamStatField::Ft => count(line.ft as f64),
            TeamStatField::Fta => count(line.fta as f64),
            TeamStatField::Ftp => pct(line.ft, line.fta),
            TeamStatField::Orb => count(line.orb as f64),
            TeamStatField::Drb => count(line.drb as f64),
            TeamStatField::Trb => count(line.trb() as f64),
            TeamStatField::Ast => count(line.ast as f64),
            TeamStatField::Tov => count(line.tov as f64),
            TeamStatField::Stl => count(line.stl as f64),
            TeamStatField::Blk => count(line.blk as f64),
            TeamStatField::Pf => count(line.pf as f64),
            TeamStatField::Pts => count(line.pts as f64),
            TeamStatField::OppPts => count(opp_pts as f64),
            TeamStatField::Diff => count(line.pts as f64 - opp_pts as f64),
        }
    }
}
