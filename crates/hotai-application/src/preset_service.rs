//! Preset editing use cases.
//!
//! Preset names are the join key migration uses to carry user edits across
//! releases, so nothing here adds, removes or renames a preset.

use hotai_core::error::{HotaiError, Result};
use hotai_core::preset::{Preset, default_preset, get_default_presets};
use hotai_core::store::Store;

pub struct PresetService {
    presets: Store<Vec<Preset>>,
}

impl PresetService {
    pub fn new(presets: Store<Vec<Preset>>) -> Self {
        Self { presets }
    }

    pub fn list(&self) -> Vec<Preset> {
        self.presets.get()
    }

    /// Presets offered to the user, in list order.
    pub fn enabled(&self) -> Vec<Preset> {
        self.presets
            .with(|list| list.iter().filter(|p| p.enabled).cloned().collect())
    }

    pub fn find(&self, name: &str) -> Result<Preset> {
        self.presets
            .with(|list| list.iter().find(|p| p.name == name).cloned())
            .ok_or_else(|| HotaiError::not_found("preset", name))
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        self.modify(name, |preset| preset.enabled = enabled)?;
        tracing::info!("[Presets] {} {}", name, if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    pub fn set_system(&self, name: &str, system: impl Into<String>) -> Result<()> {
        let system = system.into();
        self.modify(name, |preset| preset.system = system)?;
        tracing::info!("[Presets] System prompt of {} updated", name);
        Ok(())
    }

    /// Restores the default system prompt of `name`. Other fields are kept.
    pub fn reset_system(&self, name: &str) -> Result<()> {
        let default_system = default_preset(name)
            .map(|p| p.system)
            .ok_or_else(|| HotaiError::not_found("default preset", name))?;
        self.modify(name, |preset| preset.system = default_system)
    }

    /// Replaces the whole list with the defaults.
    pub fn reset_all(&self) -> Result<()> {
        tracing::info!("[Presets] Resetting all presets to defaults");
        self.presets.set(get_default_presets())
    }

    fn modify(&self, name: &str, apply: impl FnOnce(&mut Preset)) -> Result<()> {
        // Unknown names must not notify observers
        self.find(name)?;
        self.presets.update(|list| {
            if let Some(preset) = list.iter_mut().find(|p| p.name == name) {
                apply(preset);
            }
        })
    }
}
