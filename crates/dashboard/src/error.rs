use savevault_api::ApiError;
use savevault_encoder::EncodeError;
use savevault_games::StoreError;
use savevault_storage::StorageError;

/// Errors returned by [`Dashboard`](crate::Dashboard) actions.
///
/// Every variant except `Validation` has already been surfaced as an error
/// notification by the time the caller sees it.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Authentication failed; carries the text shown to the user.
    #[error("{0}")]
    Auth(String),
}
