//! Preset personas.
//!
//! A preset is a named system prompt with an icon and an enabled flag. The
//! name is stable across releases and is the key used to carry user edits
//! from one schema version to the next.

mod defaults;
mod model;

pub use defaults::{default_preset, get_default_presets};
pub use model::Preset;
