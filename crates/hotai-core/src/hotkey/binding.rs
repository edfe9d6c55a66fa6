//! Global shortcut value type.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::catalog::{KeyCatalog, ModifierCatalog};
use crate::error::{HotaiError, Result};

/// A modifier code from the backend's modifier catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierFlag(pub u32);

/// A key code from the backend's key catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

/// One global keyboard shortcut: a set of modifiers plus a single key.
///
/// `modifiers` keeps insertion order so the persisted JSON and the arguments
/// sent to the backend are byte-stable, but equality and hashing treat it as
/// a set. Duplicates are removed on construction and on deserialization
/// (first occurrence wins).
///
/// Persisted shape: `{"modifiers": [4096, 512], "key": 49}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawBinding")]
pub struct HotKeyBinding {
    modifiers: Vec<ModifierFlag>,
    key: KeyCode,
}

#[derive(Deserialize)]
struct RawBinding {
    #[serde(default)]
    modifiers: Vec<ModifierFlag>,
    key: KeyCode,
}

impl From<RawBinding> for HotKeyBinding {
    fn from(raw: RawBinding) -> Self {
        HotKeyBinding::new(raw.modifiers, raw.key)
    }
}

impl HotKeyBinding {
    pub fn new(modifiers: impl IntoIterator<Item = ModifierFlag>, key: KeyCode) -> Self {
        let mut unique: Vec<ModifierFlag> = Vec::new();
        for flag in modifiers {
            if !unique.contains(&flag) {
                unique.push(flag);
            }
        }
        Self {
            modifiers: unique,
            key,
        }
    }

    /// Builds a binding from catalog names, e.g. `(["Ctrl", "Shift"], "Space")`.
    ///
    /// Codes are only ever taken from the catalogs; an unknown name is a
    /// `NotFound` error rather than a locally invented code.
    pub fn from_names<S: AsRef<str>>(
        modifier_names: &[S],
        key_name: &str,
        modifier_catalog: &ModifierCatalog,
        key_catalog: &KeyCatalog,
    ) -> Result<Self> {
        let mut modifiers = Vec::with_capacity(modifier_names.len());
        for name in modifier_names {
            let name = name.as_ref();
            let code = modifier_catalog
                .code_of(name)
                .ok_or_else(|| HotaiError::not_found("modifier", name))?;
            modifiers.push(code);
        }
        let key = key_catalog
            .code_of(key_name)
            .ok_or_else(|| HotaiError::not_found("key", key_name))?;
        Ok(Self::new(modifiers, key))
    }

    pub fn modifiers(&self) -> &[ModifierFlag] {
        &self.modifiers
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }

    pub fn has_modifier(&self, flag: ModifierFlag) -> bool {
        self.modifiers.contains(&flag)
    }

    /// Renders the binding as `Ctrl+Shift+Space`.
    ///
    /// Codes missing from the catalogs are shown as `#<code>`.
    pub fn display(&self, modifier_catalog: &ModifierCatalog, key_catalog: &KeyCatalog) -> String {
        let mut parts: Vec<String> = self
            .modifiers
            .iter()
            .map(|m| {
                modifier_catalog
                    .name_of(*m)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{}", m.0))
            })
            .collect();
        parts.push(
            key_catalog
                .name_of(self.key)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", self.key.0)),
        );
        parts.join("+")
    }

    fn sorted_modifiers(&self) -> Vec<ModifierFlag> {
        let mut sorted = self.modifiers.clone();
        sorted.sort();
        sorted
    }
}

impl PartialEq for HotKeyBinding {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.modifiers.len() == other.modifiers.len()
            && self.modifiers.iter().all(|m| other.modifiers.contains(m))
    }
}

impl Eq for HotKeyBinding {}

impl Hash for HotKeyBinding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.sorted_modifiers().hash(state);
    }
}
