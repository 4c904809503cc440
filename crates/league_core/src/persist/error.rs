use thiserror::Error;

use crate::error::LeagueError;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid league state: {0}")]
    Invalid(#[from] LeagueError),
}

impl PersistError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            PersistError::Io(_) => true,
            PersistError::FileNotFound { .. } => true,
            PersistError::Corrupted => false,
            PersistError::ChecksumMismatch => false,
            PersistError::VersionMismatch { .. } => false,
            _ => false,
        }
    }
}
