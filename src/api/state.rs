use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::TournamentSettings;
use crate::storage::{StorageConfig, TournamentStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<TournamentStore>>,
    /// Settings given to tournaments created without their own
    pub defaults: Arc<TournamentSettings>,
}

impl AppState {
    pub fn new(storage: StorageConfig, defaults: TournamentSettings) -> Self {
        Self {
            store: Arc::new(RwLock::new(TournamentStore::new(storage))),
            defaults: Arc::new(defaults),
        }
    }
}
