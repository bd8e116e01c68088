//! Game store: the single in-memory owner of the game/save collection.
//!
//! Every mutation follows the same protocol: call the remote API, and on
//! success re-fetch the whole collection, normalize it and replace both the
//! in-memory state and the local snapshot in one step. Deleting a game is
//! the one exception: the entity is dropped locally without a re-fetch.
//!
//! # Modules
//!
//! - [`api`]: the [`GamesApi`] seam, implemented for the HTTP client
//! - [`normalize`]: raw remote records to canonical [`Game`](savevault_protocol::Game)s
//! - [`store`]: the [`GameStore`] itself
//! - [`saves_panel`]: per-game saves list with speculative entries

pub mod api;
pub mod error;
pub mod normalize;
pub mod saves_panel;
pub mod store;

#[cfg(test)]
mod test_support;

pub use api::GamesApi;
pub use error::StoreError;
pub use saves_panel::{PendingSave, SaveEntry, SavesPanel};
pub use store::GameStore;
