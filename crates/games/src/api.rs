//! Remote API seam used by the game store.

use std::future::Future;
use std::pin::Pin;

use savevault_api::{ApiError, Client};
use savevault_protocol::{Ack, GameRequest, NewSave, SaveUpdate};

/// Boxed future returned by [`GamesApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// The remote calls the store needs.
///
/// [`Client`] implements this over HTTP; tests substitute an in-memory
/// server.
pub trait GamesApi: Send + Sync {
    /// Fetches the raw, unnormalized game list.
    fn fetch_games(&self) -> ApiFuture<'_, serde_json::Value>;

    fn create_game<'a>(&'a self, req: &'a GameRequest) -> ApiFuture<'a, Ack>;

    fn update_game<'a>(&'a self, id: &'a str, req: &'a GameRequest) -> ApiFuture<'a, Ack>;

    fn delete_game<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Ack>;

    fn create_save<'a>(&'a self, game_id: &'a str, save: &'a NewSave) -> ApiFuture<'a, Ack>;

    fn update_save<'a>(&'a self, save_id: &'a str, update: &'a SaveUpdate) -> ApiFuture<'a, Ack>;

    fn delete_save<'a>(&'a self, save_id: &'a str) -> ApiFuture<'a, Ack>;
}

impl GamesApi for Client {
    fn fetch_games(&self) -> ApiFuture<'_, serde_json::Value> {
        Box::pin(Client::list_games(self))
    }

    fn create_game<'a>(&'a self, req: &'a GameRequest) -> ApiFuture<'a, Ack> {
        Box::pin(Client::create_game(self, req))
    }

    fn update_game<'a>(&'a self, id: &'a str, req: &'a GameRequest) -> ApiFuture<'a, Ack> {
        Box::pin(Client::update_game(self, id, req))
    }

    fn delete_game<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Ack> {
        Box::pin(Client::delete_game(self, id))
    }

    fn create_save<'a>(&'a self, game_id: &'a str, save: &'a NewSave) -> ApiFuture<'a, Ack> {
        Box::pin(Client::create_save(self, game_id, save))
    }

    fn update_save<'a>(&'a self, save_id: &'a str, update: &'a SaveUpdate) -> ApiFuture<'a, Ack> {
        Box::pin(Client::update_save(self, save_id, update))
    }

    fn delete_save<'a>(&'a self, save_id: &'a str) -> ApiFuture<'a, Ack> {
        Box::pin(Client::delete_save(self, save_id))
    }
}
