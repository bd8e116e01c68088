//! The game store: sole owner of the in-memory game collection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use savevault_protocol::{Ack, Game, GameRequest, NewSave, SaveUpdate};
use savevault_storage::LocalCache;

use crate::api::GamesApi;
use crate::error::StoreError;
use crate::normalize::normalize_games;

/// Holds the canonical game list and mediates every mutation.
///
/// After a successful mutation the whole collection is re-fetched and
/// replaced wholesale, so with overlapping operations the state reflects
/// whichever re-fetch completed last.
pub struct GameStore {
    api: Arc<dyn GamesApi>,
    cache: LocalCache,
    games: RwLock<Vec<Game>>,
    loading: AtomicBool,
}

impl GameStore {
    /// Creates a store seeded from the local snapshot. No network call is
    /// made.
    pub fn new(api: Arc<dyn GamesApi>, cache: LocalCache) -> Self {
        let games = cache.load();
        debug!(count = games.len(), "game store seeded from snapshot");
        Self {
            api,
            cache,
            games: RwLock::new(games),
            loading: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current collection.
    pub fn get(&self) -> Vec<Game> {
        self.read().clone()
    }

    pub fn game(&self, id: &str) -> Option<Game> {
        self.read().iter().find(|g| g.id == id).cloned()
    }

    /// Whether a remote load started by [`load`](Self::load) is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Replaces memory and snapshot together.
    ///
    /// The snapshot is written first; if that fails memory is left alone.
    pub fn replace(&self, games: Vec<Game>) -> Result<(), StoreError> {
        let mut state = self.write();
        self.cache.save(&games)?;
        *state = games;
        Ok(())
    }

    /// Fetches, normalizes and replaces the whole collection.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let raw = self.api.fetch_games().await?;
        let games = normalize_games(raw)?;
        let count = games.len();
        self.replace(games)?;
        debug!(count, "game list refreshed");
        Ok(())
    }

    /// [`refresh`](Self::refresh) with the loading flag raised for its
    /// duration.
    pub async fn load(&self) -> Result<(), StoreError> {
        let _guard = LoadingGuard::raise(&self.loading);
        self.refresh()
            .await
            .inspect_err(|e| warn!(error = %e, "loading games failed"))
    }

    /// Creates a game. Both name and cover are required.
    pub async fn add_game(&self, name: &str, cover_image: &str) -> Result<(), StoreError> {
        require(name, "game name is required")?;
        require(cover_image, "cover image is required")?;

        let req = GameRequest {
            name: name.trim().to_string(),
            cover_image: cover_image.to_string(),
        };
        let ack = self.api.create_game(&req).await?;
        self.confirm_and_refresh(ack, "add_game").await?;
        info!(name = %req.name, "game added");
        Ok(())
    }

    /// Updates a game's name and cover. The caller supplies the cover to
    /// keep when it is unchanged.
    pub async fn update_game(
        &self,
        id: &str,
        name: &str,
        cover_image: &str,
    ) -> Result<(), StoreError> {
        require(id, "game id is required")?;
        require(name, "game name is required")?;

        let req = GameRequest {
            name: name.trim().to_string(),
            cover_image: cover_image.to_string(),
        };
        let ack = self.api.update_game(id, &req).await?;
        self.confirm_and_refresh(ack, "update_game").await?;
        info!(game_id = id, "game updated");
        Ok(())
    }

    /// Deletes a game and drops it locally without re-fetching.
    pub async fn delete_game(&self, id: &str) -> Result<(), StoreError> {
        require(id, "game id is required")?;

        let ack = self.api.delete_game(id).await?;
        confirm(ack, "delete_game")?;

        {
            let mut state = self.write();
            let remaining: Vec<Game> = state.iter().filter(|g| g.id != id).cloned().collect();
            self.cache.save(&remaining)?;
            *state = remaining;
        }
        info!(game_id = id, "game deleted");
        Ok(())
    }

    /// Uploads a new save for `game_id`. Name and file data are required.
    pub async fn add_save(&self, game_id: &str, save: &NewSave) -> Result<(), StoreError> {
        require(game_id, "game id is required")?;
        validate_new_save(save)?;

        let ack = self.api.create_save(game_id, save).await?;
        self.confirm_and_refresh(ack, "add_save").await?;
        info!(game_id, name = %save.name, "save added");
        Ok(())
    }

    /// Applies a partial update to a save.
    pub async fn update_save(
        &self,
        game_id: &str,
        save_id: &str,
        updates: &SaveUpdate,
    ) -> Result<(), StoreError> {
        require(save_id, "save id is required")?;
        validate_save_update(updates)?;

        let ack = self.api.update_save(save_id, updates).await?;
        self.confirm_and_refresh(ack, "update_save").await?;
        info!(game_id, save_id, "save updated");
        Ok(())
    }

    pub async fn delete_save(&self, game_id: &str, save_id: &str) -> Result<(), StoreError> {
        require(save_id, "save id is required")?;

        let ack = self.api.delete_save(save_id).await?;
        self.confirm_and_refresh(ack, "delete_save").await?;
        info!(game_id, save_id, "save deleted");
        Ok(())
    }

    async fn confirm_and_refresh(&self, ack: Ack, op: &'static str) -> Result<(), StoreError> {
        confirm(ack, op)?;
        self.refresh().await
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Game>> {
        self.games.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Game>> {
        self.games.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Checks the fields a new save needs before anything is sent.
pub fn validate_new_save(save: &NewSave) -> Result<(), StoreError> {
    require(&save.name, "save name is required")?;
    require(&save.file_data, "save file is required")
}

/// An update must change something and may not blank the name.
pub fn validate_save_update(updates: &SaveUpdate) -> Result<(), StoreError> {
    if updates.is_empty() {
        return Err(StoreError::Validation("nothing to update".into()));
    }
    if let Some(name) = &updates.name {
        require(name, "save name cannot be empty")?;
    }
    Ok(())
}

fn require(value: &str, message: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(message.into()));
    }
    Ok(())
}

fn confirm(ack: Ack, op: &'static str) -> Result<(), StoreError> {
    if ack.success {
        Ok(())
    } else {
        warn!(op, "server did not confirm operation");
        Err(StoreError::Rejected(op))
    }
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
