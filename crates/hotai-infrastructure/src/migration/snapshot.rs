//! Historical-schema snapshots and their reconciliation.
//!
//! Each raw blob read from storage is classified into exactly one tagged
//! variant, and each variant has its own reconciliation into the current
//! domain type. Nothing here fails: unparseable or structurally wrong data
//! falls back to defaults.

use hotai_core::preset::Preset;
use hotai_core::settings::Settings;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::dto::{
    PriorPreset, SettingsV1, migrate_unversioned, prior_from_list_v1, prior_from_map_v0,
};

/// Which layout a snapshot was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    Absent,
    Unversioned,
    Current,
}

impl std::fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotKind::Absent => write!(f, "absent"),
            SnapshotKind::Unversioned => write!(f, "unversioned (v0)"),
            SnapshotKind::Current => write!(f, "current (v1)"),
        }
    }
}

/// Parses raw storage text. Missing, empty, `undefined`, `null` and
/// unparseable text all mean "absent".
pub fn parse_raw(key: &str, raw: Option<&str>) -> Option<Value> {
    let text = raw?.trim();
    if text.is_empty() || text == "undefined" {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("[Migration] Unparseable '{}' blob, using defaults: {}", key, e);
            None
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsSnapshot {
    Absent,
    /// Layout of unversioned releases (schema 0)
    Unversioned(Map<String, Value>),
    /// Current layout (schema ≥ 1)
    Current(Map<String, Value>),
}

impl SettingsSnapshot {
    /// Classifies a raw settings blob. Both layouts are JSON objects, so the
    /// stored schema version decides which one applies.
    pub fn classify(raw: Option<&str>, stored_version: u32) -> Self {
        match parse_raw(hotai_core::storage::SETTINGS_KEY, raw) {
            None => SettingsSnapshot::Absent,
            Some(Value::Object(map)) if stored_version == 0 => SettingsSnapshot::Unversioned(map),
            Some(Value::Object(map)) => SettingsSnapshot::Current(map),
            Some(other) => {
                tracing::warn!(
                    "[Migration] Settings blob is not an object ({}), using defaults",
                    json_type(&other)
                );
                SettingsSnapshot::Absent
            }
        }
    }

    pub fn kind(&self) -> SnapshotKind {
        match self {
            SettingsSnapshot::Absent => SnapshotKind::Absent,
            SettingsSnapshot::Unversioned(_) => SnapshotKind::Unversioned,
            SettingsSnapshot::Current(_) => SnapshotKind::Current,
        }
    }

    pub fn reconcile(self) -> Settings {
        match self {
            SettingsSnapshot::Absent => Settings::default(),
            SettingsSnapshot::Unversioned(map) => migrate_unversioned(&map).into(),
            SettingsSnapshot::Current(map) => {
                match serde_json::from_value::<SettingsV1>(Value::Object(map.clone())) {
                    Ok(dto) => dto.into(),
                    Err(e) => {
                        tracing::debug!("[Migration] Settings v1 damaged ({}), salvaging fields", e);
                        SettingsV1::salvage(&map).into()
                    }
                }
            }
        }
    }
}

// ============================================================================
// Presets
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PresetSnapshot {
    Absent,
    /// Name-keyed object of unversioned releases
    UnversionedMap(Map<String, Value>),
    /// Ordered array (schema ≥ 1)
    CurrentList(Vec<Value>),
}

/// Outcome of merging prior presets into the current defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetReconciliation {
    pub presets: Vec<Preset>,
    /// Defaults whose `system` text was taken from prior data
    pub preserved: Vec<String>,
    /// Prior presets with no counterpart in the defaults
    pub dropped: Vec<String>,
}

impl PresetSnapshot {
    /// Classifies a raw preset blob by shape; the two layouts are
    /// structurally distinct. A shape that disagrees with the stored version
    /// is still read, with a warning.
    pub fn classify(raw: Option<&str>, stored_version: u32) -> Self {
        match parse_raw(hotai_core::storage::PRESETS_KEY, raw) {
            None => PresetSnapshot::Absent,
            Some(Value::Object(map)) => {
                if stored_version > 0 {
                    tracing::warn!(
                        "[Migration] Preset map found under schema {}, reading as unversioned",
                        stored_version
                    );
                }
                PresetSnapshot::UnversionedMap(map)
            }
            Some(Value::Array(items)) => {
                if stored_version == 0 {
                    tracing::debug!("[Migration] Preset list found without a schema version");
                }
                PresetSnapshot::CurrentList(items)
            }
            Some(other) => {
                tracing::warn!(
                    "[Migration] Presets blob is neither map nor list ({}), using defaults",
                    json_type(&other)
                );
                PresetSnapshot::Absent
            }
        }
    }

    pub fn kind(&self) -> SnapshotKind {
        match self {
            PresetSnapshot::Absent => SnapshotKind::Absent,
            PresetSnapshot::UnversionedMap(_) => SnapshotKind::Unversioned,
            PresetSnapshot::CurrentList(_) => SnapshotKind::Current,
        }
    }

    /// Rebuilds the preset list from `defaults`, carrying over only the
    /// `system` text of prior presets with the same name.
    ///
    /// Order, `image` and `enabled` always come from `defaults`.
    pub fn reconcile(self, defaults: Vec<Preset>) -> PresetReconciliation {
        let prior = match self {
            PresetSnapshot::Absent => Vec::new(),
            PresetSnapshot::UnversionedMap(map) => prior_from_map_v0(&map),
            PresetSnapshot::CurrentList(items) => prior_from_list_v1(&items),
        };
        merge_with_defaults(prior, defaults)
    }
}

fn merge_with_defaults(prior: Vec<PriorPreset>, defaults: Vec<Preset>) -> PresetReconciliation {
    // First occurrence of a name wins
    let mut prior_by_name: HashMap<&str, Option<&str>> = HashMap::new();
    for p in &prior {
        prior_by_name
            .entry(p.name.as_str())
            .or_insert(p.system.as_deref());
    }

    let mut preserved = Vec::new();
    let presets: Vec<Preset> = defaults
        .into_iter()
        .map(|mut preset| {
            if let Some(Some(system)) = prior_by_name.get(preset.name.as_str()) {
                preset.system = (*system).to_string();
                preserved.push(preset.name.clone());
            }
            preset
        })
        .collect();

    let mut dropped: Vec<String> = Vec::new();
    for p in &prior {
        if !presets.iter().any(|d| d.name == p.name) && !dropped.contains(&p.name) {
            tracing::info!("[Migration] Dropping preset no longer shipped: {}", p.name);
            dropped.push(p.name.clone());
        }
    }

    PresetReconciliation {
        presets,
        preserved,
        dropped,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotai_core::hotkey::{HotKeyBinding, KeyCode, ModifierFlag};
    use hotai_core::preset::get_default_presets;

    fn system_of<'a>(presets: &'a [Preset], name: &str) -> &'a str {
        &presets.iter().find(|p| p.name == name).unwrap().system
    }

    #[test]
    fn test_parse_raw_absent_forms() {
        assert!(parse_raw("k", None).is_none());
        assert!(parse_raw("k", Some("")).is_none());
        assert!(parse_raw("k", Some("undefined")).is_none());
        assert!(parse_raw("k", Some("null")).is_none());
        assert!(parse_raw("k", Some("{broken")).is_none());
        assert!(parse_raw("k", Some("{}")).is_some());
    }

    #[test]
    fn test_settings_classification() {
        assert_eq!(SettingsSnapshot::classify(None, 0).kind(), SnapshotKind::Absent);
        assert_eq!(SettingsSnapshot::classify(Some("{}"), 0).kind(), SnapshotKind::Unversioned);
        assert_eq!(SettingsSnapshot::classify(Some("{}"), 1).kind(), SnapshotKind::Current);
        assert_eq!(SettingsSnapshot::classify(Some("[1,2]"), 0).kind(), SnapshotKind::Absent);
    }

    #[test]
    fn test_settings_v0_complete_record() {
        let raw = r#"{"apiKey":"sk-legacy","hotKey":{"modifiers":[4096],"key":49}}"#;
        let settings = SettingsSnapshot::classify(Some(raw), 0).reconcile();
        assert_eq!(settings.api_key.as_deref(), Some("sk-legacy"));
        assert_eq!(
            settings.hot_key,
            Some(HotKeyBinding::new([ModifierFlag(4096)], KeyCode(49)))
        );
        assert!(settings.model.is_none());
    }

    #[test]
    fn test_settings_v0_partial_record_is_salvaged() {
        let raw = r#"{"apiKey":"","legacyTheme":"dark"}"#;
        let settings = SettingsSnapshot::classify(Some(raw), 0).reconcile();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_v0_keeps_current_schema_fields() {
        let raw = r#"{"apiKey":"k","hotKey":{"modifiers":[4096],"key":49},"model":"gpt-4","alwaysOnTop":true,"bounds":{"x":0,"y":0,"width":800,"height":600}}"#;
        let settings = SettingsSnapshot::classify(Some(raw), 0).reconcile();
        assert_eq!(settings.api_key.as_deref(), Some("k"));
        assert_eq!(settings.model.as_deref(), Some("gpt-4"));
        assert_eq!(settings.always_on_top, Some(true));
        assert_eq!(settings.bounds.map(|b| b.width), Some(800));
        assert!(settings.hot_key.is_some());
    }

    #[test]
    fn test_settings_reconcile_is_stable_across_layouts() {
        let raw = r#"{"apiKey":"k","model":"m","isMaximized":true}"#;
        let as_current = SettingsSnapshot::classify(Some(raw), 1).reconcile();
        let as_unversioned = SettingsSnapshot::classify(Some(raw), 0).reconcile();
        assert_eq!(as_current, as_unversioned);
    }

    #[test]
    fn test_settings_current_with_damaged_field() {
        let raw = r#"{"apiKey":"k","model":"m","bounds":"full-screen"}"#;
        let settings = SettingsSnapshot::classify(Some(raw), 1).reconcile();
        assert_eq!(settings.api_key.as_deref(), Some("k"));
        assert_eq!(settings.model.as_deref(), Some("m"));
        assert!(settings.bounds.is_none());
    }

    #[test]
    fn test_settings_missing_model_stays_unset() {
        let raw = r#"{"apiKey":"k","hotKey":{"modifiers":[],"key":1}}"#;
        let settings = SettingsSnapshot::classify(Some(raw), 0).reconcile();
        assert!(settings.model.is_none());
        let json = serde_json::to_value(SettingsV1::from(&settings)).unwrap();
        assert!(json.get("model").is_none());
    }

    #[test]
    fn test_presets_classification_by_shape() {
        assert_eq!(PresetSnapshot::classify(Some("{}"), 0).kind(), SnapshotKind::Unversioned);
        assert_eq!(PresetSnapshot::classify(Some("[]"), 0).kind(), SnapshotKind::Current);
        assert_eq!(PresetSnapshot::classify(Some("[]"), 1).kind(), SnapshotKind::Current);
        assert_eq!(PresetSnapshot::classify(Some("\"x\""), 1).kind(), SnapshotKind::Absent);
    }

    #[test]
    fn test_presets_edit_preserved_other_fields_from_defaults() {
        let raw = r#"[{"name":"Teacher","system":"My own teacher","image":"old.png","enabled":false}]"#;
        let result = PresetSnapshot::classify(Some(raw), 1).reconcile(get_default_presets());

        let teacher = result.presets.iter().find(|p| p.name == "Teacher").unwrap();
        assert_eq!(teacher.system, "My own teacher");
        assert_eq!(teacher.image, "presets/teacher.png");
        assert!(teacher.enabled);
        assert_eq!(result.preserved, vec!["Teacher"]);
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn test_presets_unknown_dropped_new_defaults_kept_default_order() {
        let raw = r#"{"Poet":"Rhymes","Coder":"Rust only","Colleague":{"system":"Hey"}}"#;
        let defaults = get_default_presets();
        let result = PresetSnapshot::classify(Some(raw), 0).reconcile(defaults.clone());

        let names: Vec<&str> = result.presets.iter().map(|p| p.name.as_str()).collect();
        let default_names: Vec<&str> = defaults.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, default_names);
        assert_eq!(system_of(&result.presets, "Coder"), "Rust only");
        assert_eq!(system_of(&result.presets, "Colleague"), "Hey");
        assert_eq!(system_of(&result.presets, "Geek"), system_of(&defaults, "Geek"));
        assert_eq!(result.dropped, vec!["Poet"]);
    }

    #[test]
    fn test_presets_duplicate_prior_names_first_wins_no_duplicates() {
        let raw = r#"[{"name":"Geek","system":"first"},{"name":"Geek","system":"second"}]"#;
        let result = PresetSnapshot::classify(Some(raw), 1).reconcile(get_default_presets());
        assert_eq!(result.presets.len(), 6);
        assert_eq!(system_of(&result.presets, "Geek"), "first");
    }

    #[test]
    fn test_presets_absent_yields_defaults() {
        let result = PresetSnapshot::classify(Some("not json"), 0).reconcile(get_default_presets());
        assert_eq!(result.presets, get_default_presets());
        assert!(result.preserved.is_empty());
    }
}
