//! Store observers that write every new value through to storage.

use hotai_core::error::Result;
use hotai_core::preset::Preset;
use hotai_core::settings::Settings;
use hotai_core::storage::{KeyValueStore, set_json};
use hotai_core::store::StoreObserver;
use std::sync::Arc;

use crate::dto::{PresetV1, SettingsV1};

/// Persists the observed value under one storage key, in the current
/// on-disk layout.
pub struct PersistObserver {
    storage: Arc<dyn KeyValueStore>,
    key: &'static str,
}

impl PersistObserver {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self { storage, key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl StoreObserver<Settings> for PersistObserver {
    fn on_change(&self, value: &Settings) -> Result<()> {
        tracing::trace!("[Persist] Writing {}", self.key);
        set_json(self.storage.as_ref(), self.key, &SettingsV1::from(value))
    }
}

impl StoreObserver<Vec<Preset>> for PersistObserver {
    fn on_change(&self, value: &Vec<Preset>) -> Result<()> {
        tracing::trace!("[Persist] Writing {} ({} presets)", self.key, value.len());
        let dtos: Vec<PresetV1> = value.iter().map(PresetV1::from).collect();
        set_json(self.storage.as_ref(), self.key, &dtos)
    }
}
