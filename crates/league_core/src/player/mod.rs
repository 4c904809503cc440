//! Player model: generation, derived ratings, value, contracts and aging.
//!
//! - `ovr`: overall/potential/position from the rating snapshot
//! - `value`: value, value_no_pot, value_fuzz
//! - `contract`: contract asks and rookie scale
//! - `generate`: random players and draft classes
//! - `development`: the pluggable aging and retirement model

pub mod contract;
pub mod development;
pub mod generate;
pub mod names;
pub mod ovr;
pub mod value;

pub use contract::{base_amount, gen_contract, rookie_contract, round_amount};
pub use development::{develop_player, DefaultDevelopment, DevelopmentModel};
pub use generate::{gen_draft_class, gen_fuzz, gen_player, gen_ratings};
pub use value::update_values;

/// A rating as a scout sees it: the stored fuzz added, rounded and clamped.
pub fn fuzz_rating(rating: u8, fuzz: f64) -> u8 {
    (rating as f64 + fuzz).round().clamp(0.0, 100.0) as u8
}
