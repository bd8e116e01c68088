//! Game and save forms.
//!
//! Forms own their field values and a [`FileInput`]. A rejected file
//! clears the picker but never touches the form's current values.

use std::path::PathBuf;

use savevault_encoder::{COVER_IMAGE_MAX_BYTES, EncodeError, FileInput, SAVE_ARCHIVE_MAX_BYTES};
use savevault_protocol::{Game, NewSave, Save, SaveUpdate};

/// Add-or-edit form for a game.
#[derive(Debug, Clone)]
pub struct GameForm {
    editing: Option<String>,
    pub name: String,
    initial_cover: String,
    cover: String,
    preview: String,
    input: FileInput,
}

impl GameForm {
    /// Empty form for a new game.
    pub fn create() -> Self {
        Self {
            editing: None,
            name: String::new(),
            initial_cover: String::new(),
            cover: String::new(),
            preview: String::new(),
            input: FileInput::new(COVER_IMAGE_MAX_BYTES),
        }
    }

    /// Form pre-filled from `game`; its current cover is kept unless a new
    /// one is chosen.
    pub fn edit(game: &Game) -> Self {
        Self {
            editing: Some(game.id.clone()),
            name: game.name.clone(),
            initial_cover: game.cover_image.clone(),
            cover: String::new(),
            preview: game.cover_image.clone(),
            input: FileInput::new(COVER_IMAGE_MAX_BYTES),
        }
    }

    /// Id of the game being edited, `None` in create mode.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    /// Newly chosen cover, empty until one is chosen.
    pub fn cover(&self) -> &str {
        &self.cover
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn file_input(&self) -> &FileInput {
        &self.input
    }

    /// Encodes the image at `path` as the new cover.
    pub async fn choose_cover(&mut self, path: impl Into<PathBuf>) -> Result<(), EncodeError> {
        let encoded = self.input.select(path).await?;
        self.cover = encoded.data_url.clone();
        self.preview = encoded.data_url;
        Ok(())
    }

    /// The chosen cover, or the existing one when editing.
    pub fn effective_cover(&self) -> &str {
        if self.cover.is_empty() {
            &self.initial_cover
        } else {
            &self.cover
        }
    }

    pub fn can_submit(&self) -> bool {
        let cover = if self.is_edit() {
            self.effective_cover()
        } else {
            &self.cover
        };
        !self.name.trim().is_empty() && !cover.is_empty()
    }
}

/// Add-or-edit form for a save.
#[derive(Debug, Clone)]
pub struct SaveForm {
    editing: Option<String>,
    pub name: String,
    pub description: String,
    file_name: String,
    file_data: String,
    input: FileInput,
}

impl Default for SaveForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SaveForm {
    pub fn new() -> Self {
        Self {
            editing: None,
            name: String::new(),
            description: String::new(),
            file_name: String::new(),
            file_data: String::new(),
            input: FileInput::new(SAVE_ARCHIVE_MAX_BYTES),
        }
    }

    /// Form pre-filled from `save`, including its current file.
    pub fn edit(save: &Save) -> Self {
        Self {
            editing: Some(save.id.clone()),
            name: save.name.clone(),
            description: save.description.clone().unwrap_or_default(),
            file_name: save.file_name.clone(),
            file_data: save.file_data.clone(),
            input: FileInput::new(SAVE_ARCHIVE_MAX_BYTES),
        }
    }

    /// Id of the save being edited, `None` in create mode.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn has_file(&self) -> bool {
        !self.file_data.is_empty()
    }

    pub fn file_input(&self) -> &FileInput {
        &self.input
    }

    /// Encodes the archive at `path` as the save's file.
    pub async fn choose_file(&mut self, path: impl Into<PathBuf>) -> Result<(), EncodeError> {
        let encoded = self.input.select(path).await?;
        self.file_name = encoded.file_name;
        self.file_data = encoded.data_url;
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty() && self.has_file()
    }

    /// Body for a new save; name and description are trimmed.
    pub fn new_save(&self) -> NewSave {
        NewSave {
            name: self.name.trim().to_string(),
            file_name: self.file_name.clone(),
            file_data: self.file_data.clone(),
            description: self.description.trim().to_string(),
        }
    }

    /// Update carrying every field of the form.
    pub fn update(&self) -> SaveUpdate {
        SaveUpdate {
            name: Some(self.name.trim().to_string()),
            file_name: Some(self.file_name.clone()),
            file_data: Some(self.file_data.clone()),
            description: Some(self.description.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn game() -> Game {
        Game {
            id: "7".into(),
            name: "Hades".into(),
            cover_image: "https://cdn.test/hades.png".into(),
            saves: Vec::new(),
            created_at: "2024-01-01T00:00:00.000Z".into(),
        }
    }

    #[tokio::test]
    async fn create_form_needs_name_and_new_cover() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cover.png");
        std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

        let mut form = GameForm::create();
        form.name = "Hades".into();
        assert!(!form.can_submit());

        form.choose_cover(&image).await.unwrap();
        assert!(form.cover().starts_with("data:image/png;base64,"));
        assert_eq!(form.preview(), form.cover());
        assert!(form.can_submit());
    }

    #[test]
    fn edit_form_keeps_existing_cover() {
        let mut form = GameForm::edit(&game());
        assert_eq!(form.editing(), Some("7"));
        assert_eq!(form.effective_cover(), "https://cdn.test/hades.png");
        assert!(form.can_submit());

        form.name = "  ".into();
        assert!(!form.can_submit());
    }

    #[tokio::test]
    async fn oversized_cover_leaves_form_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        File::create(&path)
            .unwrap()
            .set_len(60 * 1024 * 1024)
            .unwrap();

        let mut form = GameForm::edit(&game());
        let err = form.choose_cover(&path).await.unwrap_err();

        assert!(matches!(err, EncodeError::SizeExceeded { .. }));
        assert!(form.file_input().selected().is_none());
        assert_eq!(form.cover(), "");
        assert_eq!(form.preview(), "https://cdn.test/hades.png");
        assert_eq!(form.effective_cover(), "https://cdn.test/hades.png");
    }

    #[tokio::test]
    async fn save_form_payload_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("slot1.zip");
        std::fs::write(&archive, b"PK\x03\x04").unwrap();

        let mut form = SaveForm::new();
        form.name = "  Act 2  ".into();
        form.description = " before the boss ".into();
        assert!(!form.can_submit());

        form.choose_file(&archive).await.unwrap();
        assert!(form.can_submit());

        let save = form.new_save();
        assert_eq!(save.name, "Act 2");
        assert_eq!(save.description, "before the boss");
        assert_eq!(save.file_name, "slot1.zip");
        assert!(save.file_data.starts_with("data:application/zip;base64,"));
    }

    #[test]
    fn save_edit_prefills_and_updates_every_field() {
        let save = Save {
            id: "11".into(),
            name: "Pantheon".into(),
            file_name: "user1.dat".into(),
            file_data: "data:;base64,AA==".into(),
            description: None,
            uploaded_at: String::new(),
        };
        let mut form = SaveForm::edit(&save);
        assert_eq!(form.editing(), Some("11"));
        assert!(form.can_submit());

        form.name = "Pantheon 5".into();
        let update = form.update();
        assert_eq!(update.name.as_deref(), Some("Pantheon 5"));
        assert_eq!(update.file_name.as_deref(), Some("user1.dat"));
        assert_eq!(update.file_data.as_deref(), Some("data:;base64,AA=="));
        assert_eq!(update.description.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn oversized_archive_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.zip");
        File::create(&path)
            .unwrap()
            .set_len(SAVE_ARCHIVE_MAX_BYTES + 1)
            .unwrap();

        let mut form = SaveForm::new();
        assert!(form.choose_file(&path).await.is_err());
        assert!(!form.has_file());
        assert!(form.file_input().selected().is_none());
    }
}
