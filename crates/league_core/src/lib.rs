//! # league_core - Deterministic Sports League Simulation Core
//!
//! The engine behind a sports-management sim: an indexed entity store, the
//! season phase machine, the player market, day-by-day game simulation and
//! the stat projector that feeds screen views.
//!
//! ## Features
//! - Reproducible leagues (same seed and actions = same league)
//! - Atomic phase transitions with precondition checks
//! - Typed stat projection with per-season rating fuzz
//! - Event-driven view reloading against committed snapshots
//! - Compressed, checksummed league files and JSON export

// Loader signatures and sim inputs carry many parameters
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod config;
pub mod context;
pub mod creation;
pub mod error;
pub mod events;
pub mod export;
pub mod league;
pub mod market;
pub mod models;
pub mod persist;
pub mod phase;
pub mod player;
pub mod projector;
pub mod sim;
pub mod state;
pub mod store;
pub mod views;

#[cfg(test)]
mod testutil;

pub use config::LeagueSettings;
pub use context::{LeagueContext, RngStream};
pub use creation::{create_league, NewLeague};
pub use error::{LeagueError, Result};
pub use events::{Dispatcher, EventSet, UpdateEvent, View, ViewId, ViewParams, ViewUpdate};
pub use export::{ExportArtifact, ExportDocument, ExportSelection};
pub use league::League;
pub use models::{Owner, Phase};
pub use persist::{PersistError, SaveManager};
pub use player::{DefaultDevelopment, DevelopmentModel};
pub use sim::{GameSimulator, RatingsSimulator};
pub use state::LeagueState;
pub use store::{Collection, EntityStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
