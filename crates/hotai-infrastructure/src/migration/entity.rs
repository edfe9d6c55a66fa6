//! Entities covered by schema migration.
//!
//! When adding a new persisted entity:
//! 1. Add a variant to `Entity`
//! 2. Add it to `Entity::all()`
//! 3. Add match arms to `Entity::name()` and `Entity::key()`
//! 4. Add a snapshot type and reconciliation in `snapshot.rs`
//!
//! The compiler will point at every match that needs a new arm.

use hotai_core::storage::{PRESETS_KEY, SETTINGS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// The singleton settings record
    Settings,
    /// The ordered preset list
    Presets,
}

impl Entity {
    pub const fn all() -> &'static [Entity] {
        &[Entity::Settings, Entity::Presets]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Entity::Settings => "Settings",
            Entity::Presets => "Presets",
        }
    }

    /// Storage key the entity is persisted under.
    pub const fn key(&self) -> &'static str {
        match self {
            Entity::Settings => SETTINGS_KEY,
            Entity::Presets => PRESETS_KEY,
        }
    }
}
