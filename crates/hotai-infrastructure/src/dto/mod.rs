//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs describe every shape the `settings` and `presets` keys have had
//! on disk. They are private to the infrastructure layer; the domain types in
//! `hotai-core` never see a historical layout.
//!
//! The `version` key holds a single integer for both entities:
//! - **0 / absent**: unversioned releases
//! - **1**: current layout

mod preset;
mod settings;

pub use preset::{PresetEntryV0, PresetV1, PriorPreset, prior_from_list_v1, prior_from_map_v0};
pub use settings::{SETTINGS_V1_FIELDS, SettingsV1, migrate_unversioned};
