//! Preset DTOs.
//!
//! ### Preset Version History
//! - **0** (unversioned): object keyed by preset name; each value is either
//!   the bare system prompt string or a record carrying `system`
//! - **1**: ordered array of `{ name, system, image, enabled }`

use hotai_core::preset::Preset;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the unversioned preset map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetEntryV0 {
    Text(String),
    Record {
        #[serde(default)]
        system: Option<String>,
    },
}

impl PresetEntryV0 {
    pub fn system(self) -> Option<String> {
        match self {
            PresetEntryV0::Text(system) => Some(system),
            PresetEntryV0::Record { system } => system,
        }
    }
}

/// Preset schema V1 (current).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetV1 {
    pub name: String,
    pub system: String,
    pub image: String,
    pub enabled: bool,
}

/// What migration needs from a prior preset: its join key and, if the
/// prior data carried one, the user's system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorPreset {
    pub name: String,
    pub system: Option<String>,
}

/// Extracts prior presets from an unversioned name-keyed map.
///
/// Entries whose value is neither a string nor an object are skipped.
pub fn prior_from_map_v0(map: &Map<String, Value>) -> Vec<PriorPreset> {
    map.iter()
        .filter_map(|(name, value)| {
            match serde_json::from_value::<PresetEntryV0>(value.clone()) {
                Ok(entry) => Some(PriorPreset {
                    name: name.clone(),
                    system: entry.system(),
                }),
                Err(e) => {
                    tracing::warn!("[Presets] Skipping malformed legacy entry '{}': {}", name, e);
                    None
                }
            }
        })
        .collect()
}

/// Extracts prior presets from a V1 list.
///
/// Each element is read on its own: an element without a string `name` is
/// skipped, a non-string `system` is treated as absent.
pub fn prior_from_list_v1(items: &[Value]) -> Vec<PriorPreset> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let name = item.get("name").and_then(Value::as_str);
            match name {
                Some(name) => Some(PriorPreset {
                    name: name.to_string(),
                    system: item.get("system").and_then(Value::as_str).map(str::to_string),
                }),
                None => {
                    tracing::warn!("[Presets] Skipping preset #{} without a name", index);
                    None
                }
            }
        })
        .collect()
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl From<PresetV1> for Preset {
    fn from(dto: PresetV1) -> Self {
        Preset {
            name: dto.name,
            system: dto.system,
            image: dto.image,
            enabled: dto.enabled,
        }
    }
}

impl From<&Preset> for PresetV1 {
    fn from(preset: &Preset) -> Self {
        PresetV1 {
            name: preset.name.clone(),
            system: preset.system.clone(),
            image: preset.image.clone(),
            enabled: preset.enabled,
        }
    }
}
