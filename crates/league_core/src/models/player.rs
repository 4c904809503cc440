use serde::{Deserialize, Serialize};

use super::Owner;

/// League player record.
///
/// Rating history lives inline (one snapshot per season, oldest first).
/// Stat lines are kept in the separate `playerStats` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub pid: u32,
    pub tid: Owner,
    pub name: String,
    pub pos: String,
    pub born: Born,
    pub ratings: Vec<RatingSnapshot>,
    pub contract: Contract,
    /// Mood-adjusted ask, only meaningful while the player is a free agent.
    #[serde(default)]
    pub contract_desired: Option<Contract>,
    pub draft: DraftInfo,
    #[serde(default)]
    pub injury: Injury,
    pub value: f64,
    pub value_no_pot: f64,
    pub value_fuzz: f64,
    #[serde(default)]
    pub years_free_agent: u8,
    #[serde(default)]
    pub retired_year: Option<u16>,
    /// Last team the player appeared for, used for loyalty in mood.
    #[serde(default)]
    pub last_tid: Option<u32>,
    #[serde(default)]
    pub watch: bool,
}

impl Player {
    pub fn age(&self, season: u16) -> u8 {
        season.saturating_sub(self.born.year).min(u8::MAX as u16) as u8
    }

    pub fn rating(&self, season: u16) -> Option<&RatingSnapshot> {
        self.ratings.iter().find(|r| r.season == season)
    }

    pub fn latest_rating(&self) -> Option<&RatingSnapshot> {
        self.ratings.last()
    }

    pub fn latest_rating_mut(&mut self) -> Option<&mut RatingSnapshot> {
        self.ratings.last_mut()
    }

    pub fn ovr(&self) -> u8 {
        self.latest_rating().map_or(0, |r| r.ovr)
    }

    pub fn pot(&self) -> u8 {
        self.latest_rating().map_or(0, |r| r.pot)
    }

    pub fn is_injured(&self) -> bool {
        self.injury.games_remaining > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Born {
    pub year: u16,
    pub loc: String,
}

/// Ratings for one season, with the stored scouting fuzz for that season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RatingSnapshot {
    pub season: u16,
    pub ovr: u8,
    pub pot: u8,
    pub fuzz: f64,
    pub pos: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub hgt: u8,
    pub stre: u8,
    pub spd: u8,
    pub jmp: u8,
    pub endu: u8,
    pub ins: u8,
    pub dnk: u8,
    pub ft: u8,
    pub fg: u8,
    pub tp: u8,
    pub oiq: u8,
    pub diq: u8,
    pub drb: u8,
    pub pss: u8,
    pub reb: u8,
}

/// Selector for one of the fifteen composite-free ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Skill {
    Hgt,
    Stre,
    Spd,
    Jmp,
    Endu,
    Ins,
    Dnk,
    Ft,
    Fg,
    Tp,
    Oiq,
    Diq,
    Drb,
    Pss,
    Reb,
}

impl Skill {
    pub const ALL: [Skill; 15] = [
        Skill::Hgt,
        Skill::Stre,
        Skill::Spd,
        Skill::Jmp,
        Skill::Endu,
        Skill::Ins,
        Skill::Dnk,
        Skill::Ft,
        Skill::Fg,
        Skill::Tp,
        Skill::Oiq,
        Skill::Diq,
        Skill::Drb,
        Skill::Pss,
        Skill::Reb,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Skill::Hgt => "hgt",
            Skill::Stre => "stre",
            Skill::Spd => "spd",
            Skill::Jmp => "jmp",
            Skill::Endu => "endu",
            Skill::Ins => "ins",
            Skill::Dnk => "dnk",
            Skill::Ft => "ft",
            Skill::Fg => "fg",
            Skill::Tp => "tp",
            Skill::Oiq => "oiq",
            Skill::Diq => "diq",
            Skill::Drb => "drb",
            Skill::Pss => "pss",
            Skill::Reb => "reb",
        }
    }

    pub fn from_key(key: &str) -> Option<Skill> {
        Skill::ALL.iter().copied().find(|s| s.key() == key)
    }

    /// Athletic ratings peak early and decline fastest.
    pub fn is_athletic(self) -> bool {
        matches!(self, Skill::Spd | Skill::Jmp | Skill::Endu)
    }
}

impl RatingSnapshot {
    pub fn get(&self, skill: Skill) -> u8 {
        match skill {
            Skill::Hgt => self.hgt,
            Skill::Stre => self.stre,
            Skill::Spd => self.spd,
            Skill::Jmp => self.jmp,
            Skill::Endu => self.endu,
            Skill::Ins => self.ins,
            Skill::Dnk => self.dnk,
            Skill::Ft => self.ft,
            Skill::Fg => self.fg,
            Skill::Tp => self.tp,
            Skill::Oiq => self.oiq,
            Skill::Diq => self.diq,
            Skill::Drb => self.drb,
            Skill::Pss => self.pss,
            Skill::Reb => self.reb,
        }
    }

    pub fn set(&mut self, skill: Skill, value: u8) {
        let slot = match skill {
            Skill::Hgt => &mut self.hgt,
            Skill::Stre => &mut self.stre,
            Skill::Spd => &mut self.spd,
            Skill::Jmp => &mut self.jmp,
            Skill::Endu => &mut self.endu,
            Skill::Ins => &mut self.ins,
            Skill::Dnk => &mut self.dnk,
            Skill::Ft => &mut self.ft,
            Skill::Fg => &mut self.fg,
            Skill::Tp => &mut self.tp,
            Skill::Oiq => &mut self.oiq,
            Skill::Diq => &mut self.diq,
            Skill::Drb => &mut self.drb,
            Skill::Pss => &mut self.pss,
            Skill::Reb => &mut self.reb,
        };
        *slot = value.min(100);
    }
}

/// Contract amount is in thousands; `exp` is the last season covered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Contract {
    pub amount: u32,
    pub exp: u16,
    #[serde(default)]
    pub rookie: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DraftInfo {
    pub year: u16,
    #[serde(default)]
    pub round: u8,
    #[serde(default)]
    pub pick: u8,
    #[serde(default)]
    pub tid: Option<u32>,
    #[serde(default)]
    pub original_tid: Option<u32>,
}

impl DraftInfo {
    pub fn was_drafted(&self) -> bool {
        self.round > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Injury {
    #[serde(rename = "type")]
    pub kind: String,
    pub games_remaining: u16,
}

impl Default for Injury {
    fn default() -> Self {
        Self::healthy()
    }
}

impl Injury {
    pub fn healthy() -> Self {
        Self { kind: "Healthy".to_string(), games_remaining: 0 }
    }
}
