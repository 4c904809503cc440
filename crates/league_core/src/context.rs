//! The active league's identity and clock.
//!
//! A [`LeagueContext`] is created when a league is created or loaded and
//! dropped when it is closed. Nothing in the engine keeps a copy elsewhere;
//! operations receive it explicitly.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::LeagueSettings;
use crate::error::{LeagueError, Result};
use crate::models::{GameAttribute, Phase};

/// Named RNG streams so independent consumers never share a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RngStream {
    Creation,
    DraftClass,
    Development,
    Retirement,
    Schedule,
    Game(u32),
    FreeAgency,
    FantasyDraft,
    Injury,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueContext {
    pub lid: u32,
    pub name: String,
    pub season: u16,
    pub starting_season: u16,
    pub phase: Phase,
    pub user_tid: u32,
    pub seed: u64,
    /// Regular-season days played this season.
    #[serde(default)]
    pub day: u16,
    #[serde(default)]
    pub settings: LeagueSettings,
}

impl LeagueContext {
    pub fn new(lid: u32, name: impl Into<String>, season: u16, user_tid: u32, seed: u64) -> Self {
        Self {
            lid,
            name: name.into(),
            season,
            starting_season: season,
            phase: Phase::Preseason,
            user_tid,
            seed,
            day: 0,
            settings: LeagueSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: LeagueSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Deterministic RNG for `stream` at the current point of the season.
    ///
    /// Reloading a league and repeating an operation draws the same numbers.
    pub fn rng(&self, stream: RngStream) -> ChaCha8Rng {
        let seed = fxhash::hash64(&(self.seed, self.season, self.phase.code(), self.day, stream));
        ChaCha8Rng::seed_from_u64(seed)
    }

    pub fn is_user_team(&self, tid: u32) -> bool {
        self.user_tid == tid
    }

    /// Flattened key/value view stored in the `gameAttributes` collection.
    pub fn to_attributes(&self) -> Result<Vec<GameAttribute>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(key, value)| GameAttribute { key, value })
                .collect()),
            _ => Err(LeagueError::Serialization("league context is not an object".into())),
        }
    }

    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = &'a GameAttribute>) -> Result<Self> {
        let map: serde_json::Map<String, Value> =
            attrs.into_iter().map(|a| (a.key.clone(), a.value.clone())).collect();
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}
