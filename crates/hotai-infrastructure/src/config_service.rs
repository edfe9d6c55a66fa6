//! Composition root for persisted state.
//!
//! [`ConfigService::open`] runs migration, hydrates the settings and preset
//! stores from the now-current persisted data, and wires each store to
//! write every change back through the key-value adapter.

use hotai_core::error::Result;
use hotai_core::preset::{Preset, get_default_presets};
use hotai_core::settings::Settings;
use hotai_core::storage::{KeyValueStore, PRESETS_KEY, SETTINGS_KEY};
use hotai_core::store::Store;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::dto::PresetV1;
use crate::migration::{
    CURRENT_SCHEMA_VERSION, MigrationEngine, MigrationReport, SettingsSnapshot, parse_raw,
    read_version,
};
use crate::paths::HotaiPaths;
use crate::persist_observer::PersistObserver;
use crate::storage::FileKeyValueStore;

/// Handles to the hydrated stores. Clones share the same stores.
#[derive(Clone)]
pub struct ConfigService {
    storage: Arc<dyn KeyValueStore>,
    settings: Store<Settings>,
    presets: Store<Vec<Preset>>,
    report: MigrationReport,
}

impl ConfigService {
    /// Opens persisted state through `storage`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if migration cannot read or write the
    /// adapter. Malformed persisted data is never an error.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let report = MigrationEngine::new(Arc::clone(&storage)).run()?;

        let settings = Store::new(load_settings(storage.as_ref())?);
        let presets = Store::new(load_presets(storage.as_ref())?);

        settings.attach(Arc::new(PersistObserver::new(Arc::clone(&storage), SETTINGS_KEY)));
        presets.attach(Arc::new(PersistObserver::new(Arc::clone(&storage), PRESETS_KEY)));

        tracing::debug!(
            "[ConfigService] Opened state (schema v{}, {} presets)",
            report.to_version,
            presets.with(|list| list.len())
        );

        Ok(Self {
            storage,
            settings,
            presets,
            report,
        })
    }

    /// Opens a file-backed store rooted at `dir`.
    pub fn open_at(dir: impl AsRef<Path>) -> Result<Self> {
        let storage = FileKeyValueStore::new(dir.as_ref())?;
        Self::open(Arc::new(storage))
    }

    /// Opens the file-backed store at the default location.
    pub fn open_default() -> Result<Self> {
        let dir = HotaiPaths::new(None).storage_dir()?;
        tracing::info!("[ConfigService] Using state directory {}", dir.display());
        Self::open_at(dir)
    }

    pub fn settings(&self) -> &Store<Settings> {
        &self.settings
    }

    pub fn presets(&self) -> &Store<Vec<Preset>> {
        &self.presets
    }

    pub fn migration_report(&self) -> &MigrationReport {
        &self.report
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }
}

fn load_settings(storage: &dyn KeyValueStore) -> Result<Settings> {
    let raw = storage.get(SETTINGS_KEY)?;
    let version = read_version(storage)?.max(CURRENT_SCHEMA_VERSION);
    Ok(SettingsSnapshot::classify(raw.as_deref(), version).reconcile())
}

/// Decodes the stored preset list element by element. Malformed elements are
/// skipped. An absent or unusable blob, or a non-empty list in which no
/// element decodes, yields the defaults. A stored `[]` stays empty.
fn load_presets(storage: &dyn KeyValueStore) -> Result<Vec<Preset>> {
    let raw = storage.get(PRESETS_KEY)?;
    let items = match parse_raw(PRESETS_KEY, raw.as_deref()) {
        Some(Value::Array(items)) => items,
        Some(_) | None => {
            tracing::warn!("[ConfigService] No usable preset list, using defaults");
            return Ok(get_default_presets());
        }
    };

    let stored_len = items.len();
    let presets: Vec<Preset> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<PresetV1>(item) {
            Ok(dto) => Some(Preset::from(dto)),
            Err(e) => {
                tracing::warn!("[ConfigService] Skipping malformed preset: {}", e);
                None
            }
        })
        .collect();

    if presets.is_empty() && stored_len > 0 {
        tracing::warn!("[ConfigService] No stored preset decoded, using defaults");
        return Ok(get_default_presets());
    }
    Ok(presets)
}
