use serde::{Deserialize, Serialize};

use super::StatLine;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub tid: u32,
    pub cid: u8,
    pub did: u8,
    pub region: String,
    pub name: String,
    pub abbrev: String,
    pub pop: f64,
    pub seasons: Vec<TeamSeason>,
    #[serde(default)]
    pub stats: Vec<TeamStatsRow>,
}

impl Team {
    pub fn season(&self, season: u16) -> Option<&TeamSeason> {
        self.seasons.iter().find(|s| s.season == season)
    }

    pub fn season_mut(&mut self, season: u16) -> Option<&mut TeamSeason> {
        self.seasons.iter_mut().find(|s| s.season == season)
    }

    pub fn stats_row(&self, season: u16, playoffs: bool) -> Option<&TeamStatsRow> {
        self.stats.iter().find(|s| s.season == season && s.playoffs == playoffs)
    }

    /// Returns the stats row for (season, playoffs), creating it when absent.
    pub fn stats_row_mut(&mut self, season: u16, playoffs: bool) -> &mut TeamStatsRow {
        let idx = match self.stats.iter().position(|s| s.season == season && s.playoffs == playoffs)
        {
            Some(idx) => idx,
            None => {
                self.stats.push(TeamStatsRow {
                    season,
                    playoffs,
                    line: StatLine::default(),
                    opp_pts: 0,
                });
                self.stats.len() - 1
            }
        };
        &mut self.stats[idx]
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.region, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSeason {
    pub season: u16,
    pub won: u32,
    pub lost: u32,
    /// -1 when the team missed the playoffs.
    pub playoff_rounds_won: i8,
    pub hype: f64,
    pub pop: f64,
}

impl TeamSeason {
    pub fn new(season: u16, hype: f64, pop: f64) -> Self {
        Self { season, won: 0, lost: 0, playoff_rounds_won: -1, hype, pop }
    }

    pub fn games(&self) -> u32 {
        self.won + self.lost
    }

    pub fn winp(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        self.won as f64 / games as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamStatsRow {
    pub season: u16,
    pub playoffs: bool,
    pub line: StatLine,
    pub opp_pts: u32,
}
