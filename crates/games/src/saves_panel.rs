//! Per-game saves list shown while a game's saves are open.
//!
//! The panel may show a [`PendingSave`] immediately after an upload is
//! submitted. A pending entry lives only here: it is never written to the
//! store or the snapshot, and it is replaced by the confirmed list (or
//! removed) once the operation settles. Reconciliation only happens while
//! the panel is still alive and open.

use std::sync::{Mutex, MutexGuard, Weak};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use savevault_protocol::{Game, NewSave, Save, SaveUpdate};

use crate::error::StoreError;
use crate::store::{GameStore, validate_new_save, validate_save_update};

/// An upload that has been submitted but not yet confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    /// `tmp-<unix millis>`; never sent to the server.
    pub temp_id: String,
    pub name: String,
    pub file_name: String,
    pub description: String,
    pub uploaded_at: String,
}

impl PendingSave {
    pub fn new(save: &NewSave, now: DateTime<Utc>) -> Self {
        Self {
            temp_id: format!("tmp-{}", now.timestamp_millis()),
            name: save.name.clone(),
            file_name: save.file_name.clone(),
            description: save.description.clone(),
            uploaded_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// One row of the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveEntry {
    Confirmed(Save),
    Pending(PendingSave),
}

impl SaveEntry {
    pub fn id(&self) -> &str {
        match self {
            SaveEntry::Confirmed(save) => &save.id,
            SaveEntry::Pending(pending) => &pending.temp_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SaveEntry::Confirmed(save) => &save.name,
            SaveEntry::Pending(pending) => &pending.name,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SaveEntry::Pending(_))
    }
}

#[derive(Debug)]
pub struct SavesPanel {
    game_id: String,
    game_name: String,
    entries: Vec<SaveEntry>,
    open: bool,
}

impl SavesPanel {
    /// Opens the panel on `game`'s confirmed saves.
    pub fn open(game: &Game) -> Self {
        Self {
            game_id: game.id.clone(),
            game_name: game.name.clone(),
            entries: confirmed(game),
            open: true,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    pub fn entries(&self) -> &[SaveEntry] {
        &self.entries
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Closes the panel. Later reconciliations are ignored.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Shows `save` at the top of the list until the upload settles.
    /// Returns the temporary id.
    pub fn push_pending(&mut self, save: &NewSave) -> String {
        let mut now = Utc::now();
        let mut pending = PendingSave::new(save, now);
        while self.entries.iter().any(|e| e.id() == pending.temp_id) {
            now += chrono::Duration::milliseconds(1);
            pending = PendingSave::new(save, now);
        }
        let id = pending.temp_id.clone();
        self.entries.insert(0, SaveEntry::Pending(pending));
        id
    }

    /// Drops the entry with `id`. Returns whether one was removed.
    pub fn remove_entry(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        self.entries.len() != before
    }

    /// Replaces every entry with the confirmed saves of this panel's game
    /// in `games`. A closed panel is left untouched.
    pub fn reconcile(&mut self, games: &[Game]) {
        if !self.open {
            return;
        }
        match games.iter().find(|g| g.id == self.game_id) {
            Some(game) => {
                self.game_name = game.name.clone();
                self.entries = confirmed(game);
            }
            None => self.entries.clear(),
        }
    }
}

fn confirmed(game: &Game) -> Vec<SaveEntry> {
    game.saves.iter().cloned().map(SaveEntry::Confirmed).collect()
}

fn lock(panel: &Mutex<SavesPanel>) -> MutexGuard<'_, SavesPanel> {
    panel.lock().unwrap_or_else(|e| e.into_inner())
}

/// Store operations driven from a saves panel.
///
/// The panel is held weakly: if it is dropped or closed while the request
/// is in flight, the outcome only lands in the store. Starting one of these
/// on a panel that is already gone fails with a validation error.
impl GameStore {
    pub async fn add_save_from_panel(
        &self,
        panel: Weak<Mutex<SavesPanel>>,
        save: &NewSave,
    ) -> Result<(), StoreError> {
        validate_new_save(save)?;
        let game_id = with_live_panel(&panel, |p| {
            p.push_pending(save);
            p.game_id().to_string()
        })
        .ok_or_else(panel_closed)?;

        let result = self.add_save(&game_id, save).await;
        self.reconcile_panel(&panel);
        result
    }

    pub async fn update_save_from_panel(
        &self,
        panel: Weak<Mutex<SavesPanel>>,
        save_id: &str,
        updates: &SaveUpdate,
    ) -> Result<(), StoreError> {
        validate_save_update(updates)?;
        let game_id =
            with_live_panel(&panel, |p| p.game_id().to_string()).ok_or_else(panel_closed)?;

        let result = self.update_save(&game_id, save_id, updates).await;
        self.reconcile_panel(&panel);
        result
    }

    pub async fn delete_save_from_panel(
        &self,
        panel: Weak<Mutex<SavesPanel>>,
        save_id: &str,
    ) -> Result<(), StoreError> {
        let game_id = with_live_panel(&panel, |p| {
            p.remove_entry(save_id);
            p.game_id().to_string()
        })
        .ok_or_else(panel_closed)?;

        let result = self.delete_save(&game_id, save_id).await;
        self.reconcile_panel(&panel);
        result
    }

    fn reconcile_panel(&self, panel: &Weak<Mutex<SavesPanel>>) {
        let games = self.get();
        if with_live_panel(panel, |p| p.reconcile(&games)).is_none() {
            debug!("saves panel closed, skipping reconcile");
        }
    }
}

fn panel_closed() -> StoreError {
    StoreError::Validation("saves panel is closed".into())
}

/// Runs `f` on the panel if it still exists and is open.
fn with_live_panel<T>(
    panel: &Weak<Mutex<SavesPanel>>,
    f: impl FnOnce(&mut SavesPanel) -> T,
) -> Option<T> {
    let panel = panel.upgrade()?;
    let mut guard = lock(&panel);
    if !guard.is_open() {
        return None;
    }
    Some(f(&mut guard))
}
