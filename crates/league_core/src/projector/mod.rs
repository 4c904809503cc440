//! Derived-stat projection: shapes players and teams into field maps for
//! views, with fuzz, season filtering, stat-type scaling and percentiles.
//!
//! Callers pass typed field lists; string names from the outside go through
//! the registry in [`fields`] and fail with
//! [`LeagueError::UnknownField`](crate::error::LeagueError::UnknownField).

pub mod fields;
pub mod percentile;
pub mod players;
pub mod teams;

pub use fields::{Field, FieldKind, PlayerAttr, RatingField, StatField, StatType, TeamAttr, TeamSeasonField, TeamStatField};
pub use percentile::percentile_ranks;
pub use players::{
    league_players, players_plus, project_player, summed_line, FieldSelection, PlayerView, ProjectionOptions,
};
pub use teams::{project_team, teams_plus, TeamFieldSelection, TeamOptions, TeamView};

#[cfg(test)]
mod tests;
