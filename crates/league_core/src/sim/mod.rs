//! Season simulation: schedules, games, feats and the playoff bracket.

pub mod feats;
pub mod game_sim;
pub mod play;
pub mod playoffs;
pub mod schedule;

pub use feats::detect_feats;
pub use game_sim::{GameInput, GameOutcome, GameSimulator, PlayerInput, RatingsSimulator, TeamInput};
pub use play::{
    apply_day, games_remaining, next_day_games, play_day, play_days, play_until_end, prepare_day, simulate_games,
    DaySummary,
};
pub use playoffs::{standings, start_playoffs};
pub use schedule::round_robin;
