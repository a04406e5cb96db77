//! Filesystem data lake.
//!
//! Tournaments live as JSONL under the data directory:
//! - `tournaments/tournaments.jsonl`: one document per tournament

mod jsonl;
mod tournaments;

pub use jsonl::{JsonlReader, JsonlWriter};
pub use tournaments::TournamentStore;

use std::path::PathBuf;

use thiserror::Error;

use crate::models::TournamentId;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("Tournament already exists: {0}")]
    AlreadyExists(TournamentId),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournaments_dir(&self) -> PathBuf {
        self.data_dir.join("tournaments")
    }

    pub fn tournaments_path(&self) -> PathBuf {
        self.tournaments_dir().join("tournaments.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
