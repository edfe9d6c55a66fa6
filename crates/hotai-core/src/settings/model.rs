//! Settings domain model.
//!
//! The settings record is a partial object: every field is optional and an
//! absent field means "unset", never a sentinel value.

use serde::{Deserialize, Serialize};

use crate::hotkey::HotKeyBinding;

/// Window geometry in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Singleton settings record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Credential for the language-model provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Selected model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Global show/hide shortcut
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_key: Option<HotKeyBinding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_maximized: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<WindowBounds>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field is set (first-launch shape).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
