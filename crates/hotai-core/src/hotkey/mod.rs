//! Hotkey model.
//!
//! A global shortcut is represented identically on both sides of the
//! UI/native-backend boundary: a set of modifier codes plus one key code,
//! both taken from catalogs the backend publishes.

mod binding;
mod catalog;

pub use binding::{HotKeyBinding, KeyCode, ModifierFlag};
pub use catalog::{Catalog, KeyCatalog, ModifierCatalog};
