//! Error types for game store operations.

use savevault_api::ApiError;
use savevault_storage::StorageError;

/// Errors produced by [`GameStore`](crate::GameStore) operations.
///
/// Whatever the variant, the in-memory state is unchanged when an operation
/// returns an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Rejected locally; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server answered 2xx with `success: false` (or no flag at all).
    #[error("server did not confirm {0}")]
    Rejected(&'static str),

    /// The game list came back 2xx but was not a JSON array.
    #[error("game list response was {0}, expected an array")]
    UnexpectedResponse(&'static str),

    #[error("local cache write failed: {0}")]
    Cache(#[from] StorageError),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}
