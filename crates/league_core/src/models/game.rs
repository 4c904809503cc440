use serde::{Deserialize, Serialize};

use super::StatLine;

/// A game still to be played.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledGame {
    pub gid: u32,
    pub day: u16,
    pub home_tid: u32,
    pub away_tid: u32,
}

/// A played game's box score. `teams[0]` is the home team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub gid: u32,
    pub season: u16,
    pub playoffs: bool,
    pub day: u16,
    pub overtimes: u8,
    pub teams: [BoxTeam; 2],
}

impl Game {
    pub fn winner(&self) -> u32 {
        if self.teams[0].pts >= self.teams[1].pts {
            self.teams[0].tid
        } else {
            self.teams[1].tid
        }
    }

    pub fn score(&self) -> String {
        format!("{}-{}", self.teams[0].pts, self.teams[1].pts)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoxTeam {
    pub tid: u32,
    pub pts: u32,
    pub line: StatLine,
    pub players: Vec<BoxPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoxPlayer {
    pub pid: u32,
    pub name: String,
    pub starter: bool,
    pub line: StatLine,
}

/// A notable single-game performance. Written once, never modified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feat {
    pub feat_id: u32,
    /// Game id of the performance.
    pub fid: u32,
    pub pid: u32,
    pub name: String,
    pub tid: u32,
    pub opp_tid: u32,
    pub season: u16,
    pub playoffs: bool,
    pub won: bool,
    pub score: String,
    pub line: StatLine,
}

/// Playoff bracket for one season. Rounds are appended as they start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayoffSeries {
    pub season: u16,
    pub num_rounds: u8,
    pub rounds: Vec<Vec<Matchup>>,
}

impl PlayoffSeries {
    pub fn current_round(&self) -> Option<&Vec<Matchup>> {
        self.rounds.last()
    }

    pub fn champion(&self) -> Option<u32> {
        if self.rounds.len() != self.num_rounds as usize {
            return None;
        }
        match self.rounds.last()?.as_slice() {
            [final_series] => final_series.winner(),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Matchup {
    pub home: SeriesTeam,
    pub away: SeriesTeam,
    pub games_to_win: u8,
}

impl Matchup {
    pub fn winner(&self) -> Option<u32> {
        if self.home.won >= self.games_to_win {
            Some(self.home.tid)
        } else if self.away.won >= self.games_to_win {
            Some(self.away.tid)
        } else {
            None
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesTeam {
    pub tid: u32,
    pub seed: u8,
    pub won: u8,
}
