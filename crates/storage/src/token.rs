//! Bearer token persistence.

use tracing::debug;

use crate::{KeyValueStore, StorageError, TOKEN_KEY};

/// Returns the persisted token, treating an empty value as absent.
pub fn load_token(store: &dyn KeyValueStore) -> Result<Option<String>, StorageError> {
    Ok(store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
}

/// Persists `token`.
pub fn save_token(store: &dyn KeyValueStore, token: &str) -> Result<(), StorageError> {
    store.set(TOKEN_KEY, token)?;
    debug!("persisted session token");
    Ok(())
}

/// Removes the persisted token.
pub fn clear_token(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(TOKEN_KEY)?;
    debug!("cleared session token");
    Ok(())
}
