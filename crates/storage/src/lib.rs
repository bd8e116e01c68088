//! Client-side persistence.
//!
//! A small key-value store stands in for the browser's persistent storage.
//! Three fixed keys live in it: the game snapshot ([`GAMES_KEY`]), the bearer
//! token ([`TOKEN_KEY`]) and the language preference ([`LANGUAGE_KEY`]).

pub mod cache;
pub mod kv;
pub mod token;

pub use cache::LocalCache;
pub use kv::{FileStore, KeyValueStore, MemoryStore};

/// Key of the persisted game snapshot.
pub const GAMES_KEY: &str = "games_data";

/// Key of the persisted bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key of the persisted language preference.
pub const LANGUAGE_KEY: &str = "language";

/// Errors from persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}
