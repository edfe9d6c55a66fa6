//! Settings DTOs.
//!
//! ### Settings Version History
//! - **0** (unversioned): `{ apiKey: string, hotKey: HotKey }`. Late
//!   unversioned builds already wrote some V1 fields next to those two.
//! - **1**: every field optional; adds `model`, `alwaysOnTop`,
//!   `isMaximized`, `bounds`

use hotai_core::hotkey::HotKeyBinding;
use hotai_core::settings::{Settings, WindowBounds};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Settings schema V1 (current).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_key: Option<HotKeyBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_maximized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<WindowBounds>,
}

/// Field names of [`SettingsV1`] as they appear on disk.
pub const SETTINGS_V1_FIELDS: &[&str] = &[
    "apiKey",
    "model",
    "hotKey",
    "alwaysOnTop",
    "isMaximized",
    "bounds",
];

impl SettingsV1 {
    /// Copies every current-schema field that decodes cleanly out of `map`.
    ///
    /// Unknown fields are dropped. A field whose value is `null` or does not
    /// decode is left unset instead of failing the whole record.
    pub fn salvage(map: &Map<String, Value>) -> Self {
        for key in map.keys() {
            if !SETTINGS_V1_FIELDS.contains(&key.as_str()) {
                tracing::debug!("[Settings] Dropping field not in current schema: {}", key);
            }
        }
        SettingsV1 {
            api_key: field(map, "apiKey"),
            model: field(map, "model"),
            hot_key: field(map, "hotKey"),
            always_on_top: field(map, "alwaysOnTop"),
            is_maximized: field(map, "isMaximized"),
            bounds: field(map, "bounds"),
        }
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, name: &str) -> Option<T> {
    match map.get(name) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("[Settings] Dropping malformed field '{}': {}", name, e);
                None
            }
        },
    }
}

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from an unversioned settings object to SettingsV1.
///
/// Every current-schema field present in `map` is carried over. V0 had no
/// way to say "no key yet" other than an empty string, so an empty `apiKey`
/// becomes unset.
pub fn migrate_unversioned(map: &Map<String, Value>) -> SettingsV1 {
    let mut v1 = SettingsV1::salvage(map);
    v1.api_key = v1.api_key.filter(|k| !k.is_empty());
    v1
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl From<SettingsV1> for Settings {
    fn from(dto: SettingsV1) -> Self {
        Settings {
            api_key: dto.api_key,
            model: dto.model,
            hot_key: dto.hot_key,
            always_on_top: dto.always_on_top,
            is_maximized: dto.is_maximized,
            bounds: dto.bounds,
        }
    }
}

impl From<&Settings> for SettingsV1 {
    fn from(settings: &Settings) -> Self {
        SettingsV1 {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            hot_key: settings.hot_key.clone(),
            always_on_top: settings.always_on_top,
            is_maximized: settings.is_maximized,
            bounds: settings.bounds,
        }
    }
}
