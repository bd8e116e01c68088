use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A catalogued game and the saves attached to it.
///
/// This is the canonical, normalized shape: ids are always strings and
/// `saves` only contains entries that carry at least one identifying field.
/// It is also the shape written to the local snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub saves: Vec<Save>,
    #[serde(default)]
    pub created_at: String,
}

impl Game {
    /// Number of saves attached to this game.
    pub fn saves_count(&self) -> usize {
        self.saves.len()
    }

    /// Looks up a save by id.
    pub fn save(&self, save_id: &str) -> Option<&Save> {
        self.saves.iter().find(|s| s.id == save_id)
    }
}

/// A save archive attached to a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Save {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file_name: String,
    /// Base64 data URL of the archive.
    #[serde(default)]
    pub file_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub uploaded_at: String,
}

/// A game record exactly as `GET /api/games` returns it.
///
/// The service does not hold its fields to one type: `id` may be a string
/// or a number, `saves` an array or a JSON-encoded string, `createdAt` an
/// ISO string or an epoch. Every field stays untyped until normalization so
/// one odd field never costs the whole record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGame {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub cover_url: Value,
    #[serde(default)]
    pub saves: Value,
    #[serde(default)]
    pub created_at: Value,
}

/// Renders an id value as a string: strings verbatim, numbers in decimal,
/// null as empty.
pub fn id_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_to_string(&value))
}
