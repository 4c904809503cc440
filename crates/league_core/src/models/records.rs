//! Small league bookkeeping records: negotiations, releases, awards, logs.

use serde::{Deserialize, Serialize};

use super::{Contract, Phase};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Negotiation {
    pub pid: u32,
    pub tid: u32,
    pub resigning: bool,
}

/// Salary still owed to a player after release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleasedPlayer {
    pub rpid: u32,
    pub pid: u32,
    pub tid: u32,
    pub contract: Contract,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AwardKind {
    Champion,
    Mvp,
    RookieOfTheYear,
    ScoringLeader,
    ReboundingLeader,
    AssistsLeader,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Award {
    pub aid: u32,
    pub season: u16,
    pub kind: AwardKind,
    #[serde(default)]
    pub pid: Option<u32>,
    pub tid: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub mid: u32,
    pub season: u16,
    pub phase: Phase,
    pub from: String,
    pub text: String,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NewPhase,
    Draft,
    FreeAgent,
    ReSigned,
    Release,
    Retired,
    Award,
    Injury,
    Playoffs,
}

/// Transaction log entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeagueEvent {
    pub eid: u32,
    pub season: u16,
    pub phase: Phase,
    pub kind: EventKind,
    pub text: String,
    #[serde(default)]
    pub pids: Vec<u32>,
    #[serde(default)]
    pub tids: Vec<u32>,
}

/// The pending trade proposal. `teams[0]` is the user's side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeProposal {
    pub rid: u32,
    pub teams: [TradeSide; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TradeSide {
    pub tid: u32,
    #[serde(default)]
    pub pids: Vec<u32>,
    #[serde(default)]
    pub dpids: Vec<u32>,
}

/// Key/value mirror of the league context, kept so exports carry it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameAttribute {
    pub key: String,
    pub value: serde_json::Value,
}
