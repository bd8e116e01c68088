//! Lenient JSON decoding.
//!
//! Some inputs (the persisted game snapshot, the `saves` field of a remote
//! game record) are allowed to be malformed without failing the caller: a
//! parse failure yields `T::default()` and a warning is logged. Everything
//! else in the workspace decodes strictly.

use serde::de::DeserializeOwned;
use tracing::warn;

/// Decodes `text` as JSON, falling back to `T::default()` on any error.
///
/// `context` names the input in the warning (e.g. `"games snapshot"`).
pub fn decode_or_default<T>(text: &str, context: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(context, error = %e, "malformed JSON, using default");
            T::default()
        }
    }
}

/// Converts an already-parsed JSON value, falling back to `T::default()`.
pub fn from_value_or_default<T>(value: serde_json::Value, context: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_value(value) {
        Ok(v) => v,
        Err(e) => {
            warn!(context, error = %e, "unexpected JSON shape, using default");
            T::default()
        }
    }
}
