//! Persisted mirror of the last-known game list.
//!
//! The snapshot only exists so the dashboard has something to show before
//! the first remote fetch completes. It is never consulted once the remote
//! service answers, and it is only written with confirmed [`Game`] values.

use std::sync::Arc;

use savevault_protocol::Game;
use savevault_protocol::lenient::decode_or_default;
use tracing::{debug, warn};

use crate::{GAMES_KEY, KeyValueStore, StorageError};

/// Full-replace snapshot of the game collection.
#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocalCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the snapshot.
    ///
    /// A missing, unreadable or unparsable snapshot yields an empty list.
    pub fn load(&self) -> Vec<Game> {
        match self.store.get(GAMES_KEY) {
            Ok(Some(text)) => {
                let games: Vec<Game> = decode_or_default(&text, "games snapshot");
                debug!(count = games.len(), "loaded games snapshot");
                games
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read games snapshot");
                Vec::new()
            }
        }
    }

    /// Replaces the snapshot with `games`.
    pub fn save(&self, games: &[Game]) -> Result<(), StorageError> {
        let json = serde_json::to_string(games)?;
        self.store.set(GAMES_KEY, &json)?;
        debug!(count = games.len(), "saved games snapshot");
        Ok(())
    }
}
