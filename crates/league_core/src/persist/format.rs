use super::error::PersistError;
use super::SAVE_VERSION;
use crate::context::LeagueContext;
use crate::state::LeagueState;
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Everything persisted for one league.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LeagueSave {
    /// Save format version
    pub version: u32,

    /// Save timestamp (unix milliseconds)
    pub timestamp: u64,

    pub ctx: LeagueContext,

    pub store: EntityStore,
}

impl LeagueSave {
    pub fn from_state(state: &LeagueState) -> Self {
        Self {
            version: SAVE_VERSION,
            timestamp: current_timestamp(),
            ctx: state.ctx.clone(),
            store: state.store.clone(),
        }
    }

    pub fn into_state(self) -> LeagueState {
        LeagueState { ctx: self.ctx, store: self.store }
    }

    pub fn validate(&self) -> Result<(), PersistError> {
        self.ctx.settings.validate()?;
        self.store.check_integrity()?;
        Ok(())
    }
}

/// Serialize and compress a league save
pub fn serialize_and_compress(save: &LeagueSave) -> Result<Vec<u8>, PersistError> {
    save.validate()?;

    let msgpack = to_vec_named(save).map_err(PersistError::Serialization)?;

    // Size-prepended so decompression needs no side channel
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Decompress and deserialize a league save
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<LeagueSave, PersistError> {
    // Size header + checksum
    if bytes.len() < 4 + 32 {
        return Err(PersistError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated_checksum = hasher.finalize();

    if &calculated_checksum[..] != checksum_bytes {
        return Err(PersistError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| PersistError::Decompression)?;

    let save: LeagueSave = from_slice(&msgpack).map_err(PersistError::Deserialization)?;

    if save.version != SAVE_VERSION {
        return Err(PersistError::VersionMismatch { found: save.version, expected: SAVE_VERSION });
    }

    Ok(save)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Owner, Player};
    use crate::testutil::sample_state;

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let state = sample_state();
        let save = LeagueSave::from_state(&state);

        let serialized = serialize_and_compress(&save).unwrap();
        let loaded = decompress_and_deserialize(&serialized).unwrap();

        assert_eq!(loaded.version, SAVE_VERSION);
        assert_eq!(loaded.ctx, state.ctx);
        assert_eq!(loaded.store.count::<Player>(), state.store.count::<Player>());
        assert_eq!(
            loaded.store.players_with_owner(Owner::Undrafted(3)).len(),
            state.store.players_with_owner(Owner::Undrafted(3)).len()
        );
    }

    #[test]
    fn test_checksum_validation() {
        let save = LeagueSave::from_state(&sample_state());
        let mut serialized = serialize_and_compress(&save).unwrap();

        if let Some(last) = serialized.last_mut() {
            *last = last.wrapping_add(1);
        }

        let result = decompress_and_deserialize(&serialized);
        assert!(matches!(result, Err(PersistError::ChecksumMismatch)));
    }

    #[test]
    fn test_other_version_is_rejected() {
        let mut save = LeagueSave::from_state(&sample_state());
        save.version = SAVE_VERSION + 1;
        let serialized = serialize_and_compress(&save).unwrap();

        let result = decompress_and_deserialize(&serialized);
        assert!(matches!(result, Err(PersistError::VersionMismatch { found, .. }) if found == SAVE_VERSION + 1));
    }

    #[test]
    fn test_truncated_file_is_corrupted() {
        assert!(matches!(decompress_and_deserialize(&[0u8; 10]), Err(PersistError::Corrupted)));
    }

    #[test]
    fn test_invalid_state_is_not_written() {
        let mut state = sample_state();
        let pid = state.store.players_with_owner(Owner::Undrafted(2))[0].pid;
        state.store.update::<Player>(&pid, |p| p.tid = Owner::Team(99));
        let save = LeagueSave::from_state(&state);
        assert!(matches!(serialize_and_compress(&save), Err(PersistError::Invalid(_))));
    }

    #[test]
    fn test_compression_ratio() {
        let save = LeagueSave::from_state(&sample_state());

        let uncompressed = to_vec_named(&save).unwrap();
        let compressed = serialize_and_compress(&save).unwrap();

        let ratio = compressed.len() as f32 / uncompressed.len() as f32;
        assert!(ratio < 0.8);
    }
}
