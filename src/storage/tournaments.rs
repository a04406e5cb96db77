//! Tournament persistence.

use std::collections::HashMap;

use tracing::info;

use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{Tournament, TournamentId};

/// Keep the last record per ID, in first-seen order.
fn latest_by_id(records: Vec<Tournament>) -> Vec<Tournament> {
    let mut positions: HashMap<TournamentId, usize> = HashMap::new();
    let mut latest: Vec<Tournament> = Vec::with_capacity(records.len());

    for record in records {
        match positions.get(&record.id) {
            Some(&i) => latest[i] = record,
            None => {
                positions.insert(record.id, latest.len());
                latest.push(record);
            }
        }
    }

    latest
}

/// JSONL-backed tournament store.
///
/// Appends are used for new tournaments; edits rewrite the file. Callers
/// serialize writers (the API holds it behind a lock).
#[derive(Debug, Clone)]
pub struct TournamentStore {
    config: StorageConfig,
}

impl TournamentStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn reader(&self) -> JsonlReader<Tournament> {
        JsonlReader::new(self.config.tournaments_path())
    }

    fn writer(&self) -> JsonlWriter<Tournament> {
        JsonlWriter::new(self.config.tournaments_path())
    }

    /// All tournaments, oldest first.
    pub fn list(&self) -> Result<Vec<Tournament>, StorageError> {
        let mut tournaments = latest_by_id(self.reader().read_all()?);
        tournaments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(tournaments)
    }

    pub fn get(&self, id: TournamentId) -> Result<Tournament, StorageError> {
        self.list()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(StorageError::NotFound(id))
    }

    /// Store a new tournament.
    pub fn insert(&self, tournament: &Tournament) -> Result<(), StorageError> {
        if self.list()?.iter().any(|t| t.id == tournament.id) {
            return Err(StorageError::AlreadyExists(tournament.id));
        }
        self.writer().append(tournament)?;
        info!("Created tournament {} ({})", tournament.name, tournament.id);
        Ok(())
    }

    /// Replace a stored tournament, or add it if new.
    pub fn upsert(&self, tournament: &Tournament) -> Result<(), StorageError> {
        let mut tournaments = self.list()?;
        match tournaments.iter_mut().find(|t| t.id == tournament.id) {
            Some(existing) => *existing = tournament.clone(),
            None => tournaments.push(tournament.clone()),
        }
        self.writer().write_all(&tournaments)?;
        Ok(())
    }

    pub fn delete(&self, id: TournamentId) -> Result<(), StorageError> {
        let mut tournaments = self.list()?;
        let before = tournaments.len();
        tournaments.retain(|t| t.id != id);
        if tournaments.len() == before {
            return Err(StorageError::NotFound(id));
        }
        self.writer().write_all(&tournaments)?;
        info!("Deleted tournament {}", id);
        Ok(())
    }
}
