//! Native backend contract.
//!
//! The host process owns the OS-level hook for the global shortcut, autostart
//! registration, window management and update checks. The state layer only
//! consumes it through this trait.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hotkey::{KeyCatalog, KeyCode, ModifierCatalog, ModifierFlag};
use crate::settings::WindowBounds;

/// Result of an update check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    pub current_version: String,
    pub latest_version: String,
    /// Release name
    pub name: String,
    /// Release page
    pub url: String,
}

impl UpdateInfo {
    /// True if `latest_version` is strictly newer than `current_version`.
    ///
    /// A leading `v` is accepted. If either side is not a valid semantic
    /// version the answer is `false`.
    pub fn is_newer(&self) -> bool {
        match (
            parse_version(&self.current_version),
            parse_version(&self.latest_version),
        ) {
            (Some(current), Some(latest)) => latest > current,
            _ => {
                tracing::debug!(
                    "[Update] Unparseable version pair: current={}, latest={}",
                    self.current_version,
                    self.latest_version
                );
                false
            }
        }
    }
}

fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Asynchronous calls into the native host.
///
/// Calls may suspend the caller and cannot be cancelled once issued.
#[async_trait::async_trait]
pub trait NativeBackend: Send + Sync {
    /// Modifier name → code mapping of the running platform.
    async fn query_modifier_catalog(&self) -> Result<ModifierCatalog>;

    /// Key name → code mapping of the running platform.
    async fn query_key_catalog(&self) -> Result<KeyCatalog>;

    /// Replaces the OS-level global shortcut.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the shortcut is installed
    /// - `Err(HotaiError::HotkeyRejected)`: the OS refused it (e.g. taken)
    /// - `Err(HotaiError::Backend)`: the call itself failed
    async fn commit_hotkey(&self, modifiers: &[ModifierFlag], key: KeyCode) -> Result<()>;

    /// Removes the OS-level global shortcut. Succeeds if none is installed.
    async fn unregister_hotkey(&self) -> Result<()>;

    async fn set_window_bounds(&self, bounds: WindowBounds) -> Result<()>;

    async fn get_autostart_enabled(&self) -> Result<bool>;

    async fn set_autostart_enabled(&self, enabled: bool) -> Result<()>;

    async fn check_for_update(&self) -> Result<UpdateInfo>;
}
