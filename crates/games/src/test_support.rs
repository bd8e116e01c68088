//! In-memory stand-in for the remote service.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::sync::Notify;

use savevault_api::ApiError;
use savevault_protocol::{Ack, GameRequest, NewSave, SaveUpdate};

use crate::api::{ApiFuture, GamesApi};

/// Keeps raw records the way the service would return them and logs
/// every call by operation name.
#[derive(Default)]
pub(crate) struct MockApi {
    games: Mutex<Vec<Value>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicU64,
    failing: Mutex<HashSet<&'static str>>,
    rejecting: Mutex<HashSet<&'static str>>,
    paused: Mutex<HashMap<&'static str, Arc<Notify>>>,
    fetch_body: Mutex<Option<Value>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            ..Default::default()
        }
    }

    pub fn with_games(games: Value) -> Self {
        let api = Self::new();
        if let Value::Array(items) = games {
            *api.games.lock().unwrap() = items;
        }
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == op).count()
    }

    pub fn raw_games(&self) -> Vec<Value> {
        self.games.lock().unwrap().clone()
    }

    /// Makes every call to `op` fail with HTTP 500.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Makes every call to `op` answer `{success: false}`.
    pub fn reject(&self, op: &'static str) {
        self.rejecting.lock().unwrap().insert(op);
    }

    /// Makes `fetch_games` answer `body` instead of the stored records.
    pub fn answer_fetch_with(&self, body: Value) {
        *self.fetch_body.lock().unwrap() = Some(body);
    }

    /// The next call to `op` applies its change, then waits on the
    /// returned notify before answering.
    pub fn pause_next(&self, op: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.paused.lock().unwrap().insert(op, gate.clone());
        gate
    }

    fn record(&self, op: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(op.to_string());
        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::Http {
                status: 500,
                body: r#"{"error":"boom"}"#.into(),
            });
        }
        Ok(())
    }

    fn ack(&self, op: &'static str) -> Ack {
        Ack {
            success: !self.rejecting.lock().unwrap().contains(op),
        }
    }

    fn take_gate(&self, op: &'static str) -> Option<Arc<Notify>> {
        self.paused.lock().unwrap().remove(op)
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn with_save<F>(&self, save_id: &str, f: F)
    where
        F: FnOnce(&mut Vec<Value>, usize),
    {
        let mut games = self.games.lock().unwrap();
        for game in games.iter_mut() {
            let saves = game["saves"].as_array_mut();
            if let Some(saves) = saves {
                if let Some(pos) = saves.iter().position(|s| id_matches(s, save_id)) {
                    f(saves, pos);
                    return;
                }
            }
        }
    }

    /// Runs `op`: records the call, applies `apply` unless it fails or is
    /// rejected, then honours a pending pause.
    fn run<'a, F>(&'a self, op: &'static str, apply: F) -> ApiFuture<'a, Ack>
    where
        F: FnOnce(&MockApi) + Send + 'a,
    {
        Box::pin(async move {
            self.record(op)?;
            let ack = self.ack(op);
            if ack.success {
                apply(self);
            }
            if let Some(gate) = self.take_gate(op) {
                gate.notified().await;
            }
            Ok(ack)
        })
    }
}

fn id_matches(value: &Value, id: &str) -> bool {
    savevault_protocol::types::id_to_string(&value["id"]) == id
}

impl GamesApi for MockApi {
    fn fetch_games(&self) -> ApiFuture<'_, Value> {
        Box::pin(async move {
            self.record("fetch_games")?;
            let body = self
                .fetch_body
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Value::Array(self.raw_games()));
            if let Some(gate) = self.take_gate("fetch_games") {
                gate.notified().await;
            }
            Ok(body)
        })
    }

    fn create_game<'a>(&'a self, req: &'a GameRequest) -> ApiFuture<'a, Ack> {
        self.run("create_game", move |api| {
            let id = api.next_id();
            api.games.lock().unwrap().push(json!({
                "id": id,
                "name": req.name,
                "coverUrl": format!("cdn.test/{id}.png"),
                "saves": "[]",
                "createdAt": "2025-01-01T00:00:00.000Z",
            }));
        })
    }

    fn update_game<'a>(&'a self, id: &'a str, req: &'a GameRequest) -> ApiFuture<'a, Ack> {
        self.run("update_game", move |api| {
            let mut games = api.games.lock().unwrap();
            if let Some(game) = games.iter_mut().find(|g| id_matches(g, id)) {
                game["name"] = json!(req.name);
            }
        })
    }

    fn delete_game<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Ack> {
        self.run("delete_game", move |api| {
            api.games.lock().unwrap().retain(|g| !id_matches(g, id));
        })
    }

    fn create_save<'a>(&'a self, game_id: &'a str, save: &'a NewSave) -> ApiFuture<'a, Ack> {
        self.run("create_save", move |api| {
            let id = api.next_id();
            let mut games = api.games.lock().unwrap();
            if let Some(game) = games.iter_mut().find(|g| id_matches(g, game_id)) {
                if !game["saves"].is_array() {
                    game["saves"] = json!([]);
                }
                if let Some(saves) = game["saves"].as_array_mut() {
                    saves.push(json!({
                        "id": id,
                        "name": save.name,
                        "fileName": save.file_name,
                        "fileData": save.file_data,
                        "description": save.description,
                        "uploadedAt": "2025-01-02T00:00:00.000Z",
                    }));
                }
            }
        })
    }

    fn update_save<'a>(&'a self, save_id: &'a str, update: &'a SaveUpdate) -> ApiFuture<'a, Ack> {
        self.run("update_save", move |api| {
            api.with_save(save_id, |saves, pos| {
                let save = &mut saves[pos];
                if let Some(name) = &update.name {
                    save["name"] = json!(name);
                }
                if let Some(file_name) = &update.file_name {
                    save["fileName"] = json!(file_name);
                }
                if let Some(file_data) = &update.file_data {
                    save["fileData"] = json!(file_data);
                }
                if let Some(description) = &update.description {
                    save["description"] = json!(description);
                }
            });
        })
    }

    fn delete_save<'a>(&'a self, save_id: &'a str) -> ApiFuture<'a, Ack> {
        self.run("delete_save", move |api| {
            api.with_save(save_id, |saves, pos| {
                saves.remove(pos);
            });
        })
    }
}

/// Two games, the first with two saves, in the service's raw shape.
pub(crate) fn seed() -> Value {
    json!([
        {
            "id": 1,
            "name": "Hollow Knight",
            "coverUrl": "cdn.test/hk.png",
            "saves": [
                {"id": 11, "name": "Pantheon", "fileName": "user1.dat", "fileData": "data:;base64,AA==", "uploadedAt": "2025-01-01T00:00:00.000Z"},
                {"id": 12, "name": "Path of Pain", "fileName": "user2.dat", "fileData": "data:;base64,AQ==", "uploadedAt": "2025-01-01T00:00:00.000Z"}
            ],
            "createdAt": "2024-01-01T00:00:00.000Z"
        },
        {
            "id": 2,
            "name": "Celeste",
            "coverUrl": "",
            "saves": "[]",
            "createdAt": "2024-02-01T00:00:00.000Z"
        }
    ])
}
