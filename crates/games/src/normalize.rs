//! Raw remote records to canonical [`Game`] values.
//!
//! The remote service is loose about shapes: ids may be numbers, `saves`
//! may arrive as an array or as a JSON-encoded string, and covers come back
//! as bare host paths. Everything past this module sees only [`Game`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use savevault_protocol::lenient::decode_or_default;
use savevault_protocol::types::id_to_string;
use savevault_protocol::{Game, RawGame, Save};

use crate::error::StoreError;

/// Normalizes a full game-list response.
///
/// A body that is not an array is an error: treating it as an empty list
/// would wipe the collection. Records that are not objects are skipped.
pub fn normalize_games(data: Value) -> Result<Vec<Game>, StoreError> {
    let items = match data {
        Value::Array(items) => items,
        other => {
            let kind = json_kind(&other);
            warn!(kind, "game list response is not an array");
            return Err(StoreError::UnexpectedResponse(kind));
        }
    };

    let now = now_timestamp();
    let games: Vec<Game> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawGame>(item) {
            Ok(raw) => Some(normalize_game(raw, &now)),
            Err(e) => {
                warn!(error = %e, "skipping malformed game record");
                None
            }
        })
        .collect();

    debug!(count = games.len(), "normalized game list");
    Ok(games)
}

/// Normalizes one record. `now` fills a missing `createdAt`.
pub fn normalize_game(raw: RawGame, now: &str) -> Game {
    let id = id_to_string(&raw.id);
    let saves = parse_saves(raw.saves, &id)
        .iter()
        .filter(|s| is_meaningful_save(s))
        .map(to_save)
        .collect();

    Game {
        name: id_to_string(&raw.name),
        cover_image: cover_url(&raw.cover_url),
        saves,
        created_at: created_at(&raw.created_at, now, &id),
        id,
    }
}

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn cover_url(raw: &Value) -> String {
    if is_truthy(raw) {
        format!("https://{}", id_to_string(raw))
    } else {
        String::new()
    }
}

/// Falsy values take `now`; a numeric value is read as epoch milliseconds.
fn created_at(raw: &Value, now: &str, game_id: &str) -> String {
    if !is_truthy(raw) {
        return now.to_string();
    }
    let Value::Number(n) = raw else {
        return id_to_string(raw);
    };
    let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64));
    match millis.and_then(DateTime::<Utc>::from_timestamp_millis) {
        Some(at) => at.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => {
            warn!(game_id, value = %n, "createdAt out of range, using now");
            now.to_string()
        }
    }
}

fn parse_saves(saves: Value, game_id: &str) -> Vec<Value> {
    match saves {
        Value::Array(items) => items,
        Value::String(text) if text.is_empty() => Vec::new(),
        Value::String(text) => decode_or_default(&text, "saves field"),
        Value::Null => Vec::new(),
        other => {
            warn!(game_id, kind = %json_kind(&other), "unexpected saves field");
            Vec::new()
        }
    }
}

/// A save survives if it has an id or any of fileData, fileName, name.
fn is_meaningful_save(value: &Value) -> bool {
    let has_id = value.get("id").is_some_and(|id| !id.is_null());
    has_id
        || ["fileData", "fileName", "name"]
            .iter()
            .any(|key| value.get(*key).is_some_and(is_truthy))
}

fn to_save(value: &Value) -> Save {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Save {
        id: value.get("id").map(id_to_string).unwrap_or_default(),
        name: text("name"),
        file_name: text("fileName"),
        file_data: text("fileData"),
        description: value
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        uploaded_at: text("uploadedAt"),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
