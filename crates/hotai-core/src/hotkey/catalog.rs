//! Name/code catalogs published by the native backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::binding::{KeyCode, ModifierFlag};

/// A name → code mapping as returned by one of the backend catalog queries.
///
/// The backend is the only authority on codes. A catalog is fetched once and
/// then used to translate between the names shown in the UI and the codes
/// stored in a [`HotKeyBinding`](super::HotKeyBinding).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog<C> {
    entries: BTreeMap<String, C>,
}

/// Catalog of modifier flags (`"Ctrl"`, `"Shift"`, ...).
pub type ModifierCatalog = Catalog<ModifierFlag>;

/// Catalog of key codes (`"Space"`, `"A"`, `"F1"`, ...).
pub type KeyCatalog = Catalog<KeyCode>;

impl<C: Copy + PartialEq> Catalog<C> {
    pub fn new(entries: BTreeMap<String, C>) -> Self {
        Self { entries }
    }

    /// Looks up the code registered under `name`.
    pub fn code_of(&self, name: &str) -> Option<C> {
        self.entries.get(name).copied()
    }

    /// Reverse lookup. When several names share a code the
    /// lexicographically smallest one is returned.
    pub fn name_of(&self, code: C) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| **c == code)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, C)> {
        self.entries.iter().map(|(name, code)| (name.as_str(), *code))
    }
}

impl<C> Default for Catalog<C> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<C, S: Into<String>> FromIterator<(S, C)> for Catalog<C> {
    fn from_iter<I: IntoIterator<Item = (S, C)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, c)| (n.into(), c)).collect(),
        }
    }
}
