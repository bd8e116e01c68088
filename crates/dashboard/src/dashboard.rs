//! Dashboard controller.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, warn};

use savevault_api::Client;
use savevault_encoder::{EncodeError, format_limit};
use savevault_games::{GameStore, SavesPanel, StoreError};
use savevault_protocol::{Game, NewSave, SaveUpdate};
use savevault_storage::{KeyValueStore, LocalCache};

use crate::error::DashboardError;
use crate::forms::{GameForm, SaveForm};
use crate::language::Language;
use crate::sort::{SortField, SortOrder, sort_games};
use crate::toast::{Toast, ToastQueue};

#[derive(Debug, Default)]
struct View {
    sort_field: SortField,
    sort_order: SortOrder,
    language: Language,
}

/// Everything a dashboard front-end drives.
///
/// Actions take `&self` and may overlap; each one reports its outcome
/// through the toast queue as well as its return value.
pub struct Dashboard {
    pub(crate) client: Client,
    pub(crate) store: Arc<GameStore>,
    pub(crate) kv: Arc<dyn KeyValueStore>,
    pub(crate) user: Mutex<Option<serde_json::Value>>,
    toasts: Mutex<ToastQueue>,
    view: Mutex<View>,
    panel: Mutex<Option<Arc<Mutex<SavesPanel>>>>,
}

impl Dashboard {
    /// Builds the dashboard on `client` and `kv`. The game list starts from
    /// the local snapshot; nothing is fetched yet.
    pub fn new(client: Client, kv: Arc<dyn KeyValueStore>) -> Self {
        let store = GameStore::new(Arc::new(client.clone()), LocalCache::new(kv.clone()));
        let view = View {
            language: Language::load(kv.as_ref()),
            ..View::default()
        };
        Self {
            client,
            store: Arc::new(store),
            kv,
            user: Mutex::new(None),
            toasts: Mutex::new(ToastQueue::new()),
            view: Mutex::new(view),
            panel: Mutex::new(None),
        }
    }

    /// Verifies a persisted session and, if it holds, loads the game list.
    ///
    /// A failed load is only logged; the cached list stays visible.
    pub async fn start(&self) {
        if !self.restore_session().await {
            debug!("no valid session, showing cached games only");
            return;
        }
        if let Err(e) = self.store.load().await {
            debug!(error = %e, "keeping cached games");
        }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn games(&self) -> Vec<Game> {
        self.store.get()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    // -----------------------------------------------------------------------
    // games
    // -----------------------------------------------------------------------

    pub async fn add_game(&self, name: &str, cover_image: &str) -> Result<(), DashboardError> {
        let result = self.store.add_game(name, cover_image).await;
        self.report(result, "Game added successfully!", "Error adding game")
    }

    pub async fn update_game(
        &self,
        id: &str,
        name: &str,
        cover_image: &str,
    ) -> Result<(), DashboardError> {
        let result = self.store.update_game(id, name, cover_image).await;
        self.report(result, "Game updated successfully!", "Error updating game")
    }

    pub async fn delete_game(&self, id: &str) -> Result<(), DashboardError> {
        let result = self.store.delete_game(id).await;
        if result.is_ok() {
            let shown = lock(&self.panel).as_ref().map(|p| lock(p).game_id() == id);
            if shown == Some(true) {
                self.close_saves();
            }
        }
        self.report(result, "Game deleted successfully!", "Error deleting game")
    }

    /// Submits `form` as a create or an update depending on its mode.
    pub async fn submit_game_form(&self, form: &GameForm) -> Result<(), DashboardError> {
        if !form.can_submit() {
            return Err(DashboardError::Validation(
                "name and cover image are required".into(),
            ));
        }
        match form.editing() {
            None => self.add_game(&form.name, form.effective_cover()).await,
            Some(id) => self.update_game(id, &form.name, form.effective_cover()).await,
        }
    }

    /// Picks the cover image for `form`. A rejected image is reported and
    /// leaves the form's cover and preview as they were.
    pub async fn choose_cover(
        &self,
        form: &mut GameForm,
        path: impl Into<PathBuf>,
    ) -> Result<(), DashboardError> {
        let result = form.choose_cover(path).await;
        self.report_file(result, "image")
    }

    // -----------------------------------------------------------------------
    // saves
    // -----------------------------------------------------------------------

    /// Opens the saves panel for `game_id`, closing any other one.
    pub fn open_saves(&self, game_id: &str) -> Option<Arc<Mutex<SavesPanel>>> {
        let game = self.store.game(game_id)?;
        let panel = Arc::new(Mutex::new(SavesPanel::open(&game)));
        if let Some(previous) = lock(&self.panel).replace(panel.clone()) {
            lock(&previous).close();
        }
        Some(panel)
    }

    pub fn saves_panel(&self) -> Option<Arc<Mutex<SavesPanel>>> {
        lock(&self.panel).clone()
    }

    /// Closes the saves panel. Operations still in flight no longer touch
    /// it.
    pub fn close_saves(&self) {
        if let Some(panel) = lock(&self.panel).take() {
            lock(&panel).close();
        }
    }

    pub async fn add_save(&self, save: &NewSave) -> Result<(), DashboardError> {
        let panel = self.live_panel()?;
        let result = self.store.add_save_from_panel(panel, save).await;
        self.report(result, "Save added successfully!", "Error adding save")
    }

    pub async fn update_save(
        &self,
        save_id: &str,
        updates: &SaveUpdate,
    ) -> Result<(), DashboardError> {
        let panel = self.live_panel()?;
        let result = self.store.update_save_from_panel(panel, save_id, updates).await;
        self.report(result, "Save updated successfully!", "Error updating save")
    }

    pub async fn delete_save(&self, save_id: &str) -> Result<(), DashboardError> {
        let panel = self.live_panel()?;
        let result = self.store.delete_save_from_panel(panel, save_id).await;
        self.report(result, "Save deleted successfully!", "Error deleting save")
    }

    /// Submits `form` against the open saves panel.
    pub async fn submit_save_form(&self, form: &SaveForm) -> Result<(), DashboardError> {
        if !form.can_submit() {
            return Err(DashboardError::Validation(
                "save name and file are required".into(),
            ));
        }
        match form.editing() {
            None => self.add_save(&form.new_save()).await,
            Some(save_id) => self.update_save(save_id, &form.update()).await,
        }
    }

    /// Picks the archive for `form`. A rejected file is reported and the
    /// picker is cleared.
    pub async fn choose_save_file(
        &self,
        form: &mut SaveForm,
        path: impl Into<PathBuf>,
    ) -> Result<(), DashboardError> {
        let result = form.choose_file(path).await;
        self.report_file(result, "file")
    }

    /// Downloads a save archive into `dest_dir`.
    pub async fn download_save(
        &self,
        save_id: &str,
        file_name: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, DashboardError> {
        match self.client.download_save(save_id, file_name, dest_dir).await {
            Ok(path) => Ok(path),
            Err(e) => {
                warn!(save_id, error = %e, "save download failed");
                self.toasts().error("Error downloading save");
                Err(e.into())
            }
        }
    }

    fn live_panel(&self) -> Result<Weak<Mutex<SavesPanel>>, DashboardError> {
        lock(&self.panel)
            .as_ref()
            .map(Arc::downgrade)
            .ok_or_else(|| DashboardError::Validation("no saves panel is open".into()))
    }

    // -----------------------------------------------------------------------
    // view state
    // -----------------------------------------------------------------------

    /// Games in the current sort order.
    pub fn sorted_games(&self) -> Vec<Game> {
        let (field, order) = self.sort();
        let mut games = self.store.get();
        sort_games(&mut games, field, order);
        games
    }

    pub fn sort(&self) -> (SortField, SortOrder) {
        let view = lock(&self.view);
        (view.sort_field, view.sort_order)
    }

    pub fn sort_by(&self, field: SortField) {
        lock(&self.view).sort_field = field;
    }

    pub fn toggle_sort_order(&self) -> SortOrder {
        let mut view = lock(&self.view);
        view.sort_order = view.sort_order.toggled();
        view.sort_order
    }

    pub fn language(&self) -> Language {
        lock(&self.view).language
    }

    /// Switches language and persists the choice.
    pub fn set_language(&self, language: Language) -> Result<(), DashboardError> {
        language.store(self.kv.as_ref())?;
        lock(&self.view).language = language;
        Ok(())
    }

    /// Current notifications, oldest first.
    pub fn notifications(&self) -> Vec<Toast> {
        self.toasts().iter().cloned().collect()
    }

    pub fn dismiss_notification(&self, id: u64) -> bool {
        self.toasts().dismiss(id)
    }

    pub(crate) fn toasts(&self) -> MutexGuard<'_, ToastQueue> {
        lock(&self.toasts)
    }

    /// Turns a store outcome into a notification. Local validation
    /// failures are returned without one.
    fn report(
        &self,
        result: Result<(), StoreError>,
        success: &str,
        failure: &str,
    ) -> Result<(), DashboardError> {
        match result {
            Ok(()) => {
                self.toasts().success(success);
                Ok(())
            }
            Err(e) if e.is_validation() => Err(e.into()),
            Err(e) => {
                warn!(error = %e, action = failure, "dashboard action failed");
                let detail = match &e {
                    StoreError::Api(api) => api.server_message(),
                    _ => None,
                };
                self.toasts().error_with(failure, detail);
                Err(e.into())
            }
        }
    }

    /// Reports a rejected file pick. `what` names the file in the message.
    fn report_file(
        &self,
        result: Result<(), EncodeError>,
        what: &str,
    ) -> Result<(), DashboardError> {
        let Err(e) = result else {
            return Ok(());
        };
        warn!(error = %e, what, "file rejected");
        let detail = match &e {
            EncodeError::SizeExceeded { limit, .. } => {
                format!("The {what} cannot exceed {}", format_limit(*limit))
            }
            EncodeError::Io(_) => format!("The {what} could not be read"),
        };
        self.toasts().error_with("Error", Some(detail));
        Err(e.into())
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
