//! Key-value persistence contract.
//!
//! Defines the durable string-key → JSON-text mapping the state layer
//! persists through, decoupled from the concrete medium (files, browser
//! storage, memory).

use serde::Serialize;

use crate::error::Result;

/// Persisted key holding the settings record.
pub const SETTINGS_KEY: &str = "settings";
/// Persisted key holding the preset list.
pub const PRESETS_KEY: &str = "presets";
/// Persisted key holding the schema version integer.
pub const VERSION_KEY: &str = "version";

/// Durable mapping from string keys to raw JSON text.
///
/// # Implementation Notes
///
/// - A missing key is a normal outcome (`Ok(None)`), never an error.
/// - `set_raw` either fully applies or fails; a failure means the adapter
///   is unavailable and callers treat it as fatal.
/// - Both operations are synchronous.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw text stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `text` under `key`, replacing any prior value.
    fn set_raw(&self, key: &str, text: &str) -> Result<()>;
}

/// Serializes `value` to JSON text and stores it under `key`.
pub fn set_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let text = serde_json::to_string(value)?;
    store.set_raw(key, &text)
}
