//! Schema migration for persisted state.
//!
//! Persisted data carries a single integer `version` key. When it is absent
//! or below [`CURRENT_SCHEMA_VERSION`], every entity is rebuilt from its
//! prior snapshot and rewritten in the current layout, and only then is the
//! new version recorded. A stored version above the target is left alone.
//!
//! # Architecture
//!
//! ```text
//!   raw "settings" ──► SettingsSnapshot ──reconcile──► Settings  ──► SettingsV1 ─┐
//!   raw "presets"  ──► PresetSnapshot   ──reconcile──► Vec<Preset> ► [PresetV1] ─┤
//!                                                                                ▼
//!                                                               write "version" last
//! ```
//!
//! Writing the version last means a crash mid-run leaves the old version in
//! place, and the next launch simply migrates again. Reconciliation is a pure
//! function of the prior snapshot and the defaults, so re-running it is safe.
//!
//! # Adding a New Entity
//!
//! 1. Add a variant to [`Entity`] (`entity.rs`)
//! 2. Add its historical DTOs under `crate::dto`
//! 3. Add a snapshot type with `classify` and `reconcile` (`snapshot.rs`)
//! 4. Add a match arm to `MigrationEngine::run`
//! 5. If the layout changes, bump [`CURRENT_SCHEMA_VERSION`]

mod entity;
mod snapshot;
mod version;

pub use entity::Entity;
pub use snapshot::{
    PresetReconciliation, PresetSnapshot, SettingsSnapshot, SnapshotKind, parse_raw,
};
pub use version::{CURRENT_SCHEMA_VERSION, MigrationState, read_version, write_version};

use hotai_core::error::Result;
use hotai_core::preset::{Preset, get_default_presets};
use hotai_core::settings::Settings;
use hotai_core::storage::{KeyValueStore, set_json};
use serde::Serialize;
use std::sync::Arc;

use crate::dto::{PresetV1, SettingsV1};

/// What a call to [`MigrationEngine::run`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Whether anything was rewritten
    pub performed: bool,
    pub from_version: u32,
    pub to_version: u32,
    pub settings_source: SnapshotKind,
    pub presets_source: SnapshotKind,
    /// Default presets whose `system` text was carried over
    pub preserved_presets: Vec<String>,
    /// Prior presets that no longer exist in the defaults
    pub dropped_presets: Vec<String>,
}

impl MigrationReport {
    fn skipped(stored: u32) -> Self {
        Self {
            performed: false,
            from_version: stored,
            to_version: stored,
            settings_source: SnapshotKind::Current,
            presets_source: SnapshotKind::Current,
            preserved_presets: Vec::new(),
            dropped_presets: Vec::new(),
        }
    }
}

/// Brings persisted data up to the target schema version.
pub struct MigrationEngine {
    store: Arc<dyn KeyValueStore>,
    defaults: Vec<Preset>,
    target: u32,
}

impl MigrationEngine {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            defaults: get_default_presets(),
            target: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Overrides the preset defaults reconciliation merges into.
    pub fn with_defaults(mut self, defaults: Vec<Preset>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_target_version(mut self, target: u32) -> Self {
        self.target = target;
        self
    }

    pub fn state(&self) -> Result<MigrationState> {
        let stored = read_version(self.store.as_ref())?;
        Ok(MigrationState::evaluate(stored, self.target))
    }

    /// Runs the migration if the stored version calls for it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the adapter cannot be read or written.
    /// Malformed prior data never causes an error.
    pub fn run(&self) -> Result<MigrationReport> {
        let stored = match self.state()? {
            MigrationState::Current => {
                tracing::debug!("[Migration] Schema is current (v{})", self.target);
                return Ok(MigrationReport::skipped(self.target));
            }
            MigrationState::Ahead { stored } => {
                tracing::warn!(
                    "[Migration] Stored schema v{} is newer than supported v{}, leaving data untouched",
                    stored,
                    self.target
                );
                return Ok(MigrationReport::skipped(stored));
            }
            MigrationState::Unmigrated { stored } => stored,
        };

        tracing::info!("[Migration] Migrating state from v{} to v{}", stored, self.target);

        let mut settings_source = SnapshotKind::Absent;
        let mut presets_source = SnapshotKind::Absent;
        let mut preserved_presets = Vec::new();
        let mut dropped_presets = Vec::new();

        for entity in Entity::all() {
            let raw = self.store.get(entity.key())?;
            match entity {
                Entity::Settings => {
                    let snapshot = SettingsSnapshot::classify(raw.as_deref(), stored);
                    settings_source = snapshot.kind();
                    let settings: Settings = snapshot.reconcile();
                    set_json(self.store.as_ref(), entity.key(), &SettingsV1::from(&settings))?;
                }
                Entity::Presets => {
                    let snapshot = PresetSnapshot::classify(raw.as_deref(), stored);
                    presets_source = snapshot.kind();
                    let result = snapshot.reconcile(self.defaults.clone());
                    let dtos: Vec<PresetV1> = result.presets.iter().map(PresetV1::from).collect();
                    set_json(self.store.as_ref(), entity.key(), &dtos)?;
                    preserved_presets = result.preserved;
                    dropped_presets = result.dropped;
                }
            }
            tracing::debug!("[Migration] {} rewritten", entity.name());
        }

        write_version(self.store.as_ref(), self.target)?;

        tracing::info!(
            "[Migration] Done: settings from {}, presets from {} ({} preserved, {} dropped)",
            settings_source,
            presets_source,
            preserved_presets.len(),
            dropped_presets.len()
        );

        Ok(MigrationReport {
            performed: true,
            from_version: stored,
            to_version: self.target,
            settings_source,
            presets_source,
            preserved_presets,
            dropped_presets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use hotai_core::storage::{PRESETS_KEY, SETTINGS_KEY, VERSION_KEY};

    fn engine(store: &Arc<MemoryKeyValueStore>) -> MigrationEngine {
        MigrationEngine::new(store.clone() as Arc<dyn KeyValueStore>)
    }

    #[test]
    fn test_first_launch_writes_defaults_and_version() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let report = engine(&store).run().unwrap();

        assert!(report.performed);
        assert_eq!(report.from_version, 0);
        assert_eq!(report.to_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(report.settings_source, SnapshotKind::Absent);
        assert_eq!(store.get(SETTINGS_KEY).unwrap().as_deref(), Some("{}"));
        assert_eq!(store.get(VERSION_KEY).unwrap().as_deref(), Some("1"));

        let presets: Vec<PresetV1> =
            serde_json::from_str(&store.get(PRESETS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(presets.len(), get_default_presets().len());
    }

    #[test]
    fn test_second_run_is_noop() {
        let store = Arc::new(MemoryKeyValueStore::new());
        engine(&store).run().unwrap();
        let writes = store.write_count();

        let report = engine(&store).run().unwrap();
        assert!(!report.performed);
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn test_ahead_version_left_untouched() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set_raw(VERSION_KEY, "7").unwrap();
        store.set_raw(SETTINGS_KEY, r#"{"futureField":1}"#).unwrap();

        let report = engine(&store).run().unwrap();
        assert!(!report.performed);
        assert_eq!(report.from_version, 7);
        assert_eq!(store.get(VERSION_KEY).unwrap().as_deref(), Some("7"));
        assert_eq!(
            store.get(SETTINGS_KEY).unwrap().as_deref(),
            Some(r#"{"futureField":1}"#)
        );
    }

    #[test]
    fn test_custom_target_and_defaults() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set_raw(PRESETS_KEY, r#"{"Solo":"kept","Gone":"x"}"#).unwrap();
        let defaults = vec![Preset::new("Solo", "stock", "presets/solo.png", true)];

        let report = engine(&store)
            .with_defaults(defaults)
            .with_target_version(1)
            .run()
            .unwrap();
        assert_eq!(report.preserved_presets, vec!["Solo"]);
        assert_eq!(report.dropped_presets, vec!["Gone"]);
    }

    #[test]
    fn test_unavailable_store_is_an_error_and_version_not_written() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set_unavailable(true);
        let err = engine(&store).run().unwrap_err();
        assert!(err.is_storage());
        store.set_unavailable(false);
        assert!(store.get(VERSION_KEY).unwrap().is_none());
    }
}
