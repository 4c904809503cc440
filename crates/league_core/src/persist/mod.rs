//! League files on disk.
//!
//! A save is MessagePack (named fields) compressed with LZ4, followed by a
//! SHA-256 checksum of the compressed bytes. Writes go to a temp file that is
//! renamed into place.

pub mod error;
pub mod format;
pub mod manager;

pub use error::PersistError;
pub use format::{decompress_and_deserialize, serialize_and_compress, LeagueSave};
pub use manager::{LeagueFileInfo, SaveManager};

pub const SAVE_VERSION: u32 = 1;
pub const SAVE_EXTENSION: &str = "league";
