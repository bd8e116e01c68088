//! Interface language preference.

use std::fmt;

use savevault_storage::{KeyValueStore, LANGUAGE_KEY, StorageError};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Pt,
    #[default]
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Pt, Language::En, Language::Es];

    pub fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
            Language::Es => "es",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Reads the stored preference. Absent, unknown or unreadable values
    /// give the default.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(LANGUAGE_KEY) {
            Ok(Some(code)) => Self::from_code(&code).unwrap_or_else(|| {
                warn!(code = %code, "unknown stored language, using default");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "failed to read language preference");
                Self::default()
            }
        }
    }

    pub fn store(self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(LANGUAGE_KEY, self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
