use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LeagueError;

/// Named collections of the league database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Players,
    ReleasedPlayers,
    Awards,
    PlayerStats,
    Teams,
    Schedule,
    PlayoffSeries,
    DraftPicks,
    Trade,
    Negotiations,
    GameAttributes,
    DraftOrder,
    Messages,
    Events,
    Games,
    PlayerFeats,
}

impl Collection {
    pub const ALL: [Collection; 16] = [
        Collection::Players,
        Collection::ReleasedPlayers,
        Collection::Awards,
        Collection::PlayerStats,
        Collection::Teams,
        Collection::Schedule,
        Collection::PlayoffSeries,
        Collection::DraftPicks,
        Collection::Trade,
        Collection::Negotiations,
        Collection::GameAttributes,
        Collection::DraftOrder,
        Collection::Messages,
        Collection::Events,
        Collection::Games,
        Collection::PlayerFeats,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Players => "players",
            Collection::ReleasedPlayers => "releasedPlayers",
            Collection::Awards => "awards",
            Collection::PlayerStats => "playerStats",
            Collection::Teams => "teams",
            Collection::Schedule => "schedule",
            Collection::PlayoffSeries => "playoffSeries",
            Collection::DraftPicks => "draftPicks",
            Collection::Trade => "trade",
            Collection::Negotiations => "negotiations",
            Collection::GameAttributes => "gameAttributes",
            Collection::DraftOrder => "draftOrder",
            Collection::Messages => "messages",
            Collection::Events => "events",
            Collection::Games => "games",
            Collection::PlayerFeats => "playerFeats",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| LeagueError::UnknownCollection(s.to_string()))
    }
}
