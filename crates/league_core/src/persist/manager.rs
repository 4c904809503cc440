use super::error::PersistError;
use super::format::{decompress_and_deserialize, serialize_and_compress, LeagueSave};
use super::SAVE_EXTENSION;
use crate::models::Phase;
use crate::state::LeagueState;

use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// League files kept in one directory, one file per league id.
#[derive(Debug, Clone)]
pub struct SaveManager {
    dir: PathBuf,
}

impl SaveManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, lid: u32) -> PathBuf {
        self.dir.join(format!("league_{}.{}", lid, SAVE_EXTENSION))
    }

    pub fn save(&self, state: &LeagueState) -> Result<PathBuf, PersistError> {
        let path = self.path_for(state.ctx.lid);
        Self::save_to_path(&path, &LeagueSave::from_state(state))?;
        log::info!("League {} saved ({} {})", state.ctx.lid, state.ctx.season, state.ctx.phase);
        Ok(path)
    }

    pub fn load(&self, lid: u32) -> Result<LeagueState, PersistError> {
        let save = Self::load_from_path(&self.path_for(lid))?;
        log::info!("League {} loaded", lid);
        Ok(save.into_state())
    }

    pub fn exists(&self, lid: u32) -> bool {
        self.path_for(lid).exists()
    }

    pub fn delete(&self, lid: u32) -> Result<(), PersistError> {
        let path = self.path_for(lid);
        if path.exists() {
            remove_file(&path)?;
            log::info!("Deleted league {}", lid);
        }
        Ok(())
    }

    /// First league id without a file.
    pub fn next_lid(&self) -> u32 {
        self.list().iter().map(|info| info.lid + 1).max().unwrap_or(0)
    }

    /// Every readable league in the directory, most recently saved first.
    /// Unreadable files are skipped.
    pub fn list(&self) -> Vec<LeagueFileInfo> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut leagues: Vec<LeagueFileInfo> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(SAVE_EXTENSION))
            .filter_map(|path| match Self::load_from_path(&path) {
                Ok(save) => Some(LeagueFileInfo::from_save(&save, path)),
                Err(e) => {
                    log::warn!("Skipping unreadable league file {:?}: {}", path, e);
                    None
                }
            })
            .collect();

        leagues.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        leagues
    }

    pub fn save_to_path(path: &Path, save: &LeagueSave) -> Result<(), PersistError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serialize_and_compress(save)?;

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }

        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<LeagueSave, PersistError> {
        if !path.exists() {
            return Err(PersistError::FileNotFound { path: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let save = decompress_and_deserialize(&data)?;
        save.validate()?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(save)
    }
}

/// Summary shown in league pickers.
#[derive(Debug, Clone)]
pub struct LeagueFileInfo {
    pub lid: u32,
    pub name: String,
    pub season: u16,
    pub phase: Phase,
    pub timestamp: u64,
    pub path: PathBuf,
}

impl LeagueFileInfo {
    fn from_save(save: &LeagueSave, path: PathBuf) -> Self {
        Self {
            lid: save.ctx.lid,
            name: save.ctx.name.clone(),
            season: save.ctx.season,
            phase: save.ctx.phase,
            timestamp: save.timestamp,
            path,
        }
    }

    pub fn format_timestamp(&self) -> String {
        use time::{format_description::well_known::Rfc3339, OffsetDateTime};

        let timestamp =
            OffsetDateTime::from_unix_timestamp_nanos((self.timestamp as i128) * 1_000_000)
                .unwrap_or_else(|_| OffsetDateTime::now_utc());

        timestamp.format(&Rfc3339).unwrap_or_else(|_| "Unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Player;
    use crate::testutil::sample_state;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());
        let state = sample_state();

        let path = manager.save(&state).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let loaded = manager.load(state.ctx.lid).unwrap();
        assert_eq!(loaded.ctx, state.ctx);
        let original: Vec<&Player> = state.store.get_all::<Player>().collect();
        let restored: Vec<&Player> = loaded.store.get_all::<Player>().collect();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());
        let err = manager.load(7).unwrap_err();
        assert!(matches!(err, PersistError::FileNotFound { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_list_skips_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());
        let state = sample_state();
        manager.save(&state).unwrap();
        std::fs::write(temp_dir.path().join("junk.league"), b"not a league").unwrap();

        let listed = manager.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, state.ctx.name);
        assert_eq!(manager.next_lid(), state.ctx.lid + 1);

        manager.delete(state.ctx.lid).unwrap();
        assert!(!manager.exists(state.ctx.lid));
    }
}
