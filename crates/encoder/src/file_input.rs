use std::path::{Path, PathBuf};

use tracing::warn;

use crate::{EncodeError, EncodedFile, encode_file};

/// Selection state of a file picker bound to one size ceiling.
///
/// A failed selection clears the picker so the same or another file can be
/// chosen again immediately. Whatever form value the caller derives from a
/// successful selection is the caller's to keep; this type never touches it.
#[derive(Debug, Clone)]
pub struct FileInput {
    max_bytes: u64,
    selected: Option<PathBuf>,
}

impl FileInput {
    /// Creates an empty picker with the given ceiling.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            selected: None,
        }
    }

    /// The ceiling this picker enforces.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Currently selected file, if any.
    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Drops the current selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Selects `path` and encodes it.
    ///
    /// On error the selection is cleared and the error returned.
    pub async fn select(&mut self, path: impl Into<PathBuf>) -> Result<EncodedFile, EncodeError> {
        let path = path.into();
        self.selected = Some(path.clone());

        match encode_file(&path, self.max_bytes).await {
            Ok(encoded) => Ok(encoded),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "file selection rejected");
                self.clear();
                Err(e)
            }
        }
    }
}
