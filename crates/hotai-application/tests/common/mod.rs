#![allow(dead_code)]

use async_trait::async_trait;
use hotai_core::backend::{NativeBackend, UpdateInfo};
use hotai_core::error::{HotaiError, Result};
use hotai_core::hotkey::{KeyCatalog, KeyCode, ModifierCatalog, ModifierFlag};
use hotai_core::settings::WindowBounds;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub const CTRL: ModifierFlag = ModifierFlag(4096);
pub const SHIFT: ModifierFlag = ModifierFlag(512);
pub const SPACE: KeyCode = KeyCode(49);
pub const KEY_A: KeyCode = KeyCode(0);
pub const KEY_K: KeyCode = KeyCode(40);

/// Scriptable in-process stand-in for the native host.
#[derive(Default)]
pub struct MockBackend {
    pub commits: Mutex<Vec<(Vec<ModifierFlag>, KeyCode)>>,
    /// Shortcut the OS hook currently holds
    pub installed: Mutex<Option<(Vec<ModifierFlag>, KeyCode)>>,
    pub unregisters: AtomicUsize,
    pub bounds: Mutex<Vec<WindowBounds>>,
    pub catalog_queries: AtomicUsize,
    pub autostart: AtomicBool,
    /// Keys the OS reports as already taken
    taken: Mutex<HashSet<KeyCode>>,
    /// Artificial latency per key
    delays: Mutex<HashMap<KeyCode, Duration>>,
    unreachable: AtomicBool,
    latest_version: Mutex<String>,
}

impl MockBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        *backend.latest_version.lock().unwrap() = "1.0.0".to_string();
        backend
    }

    pub fn reject_key(&self, key: KeyCode) {
        self.taken.lock().unwrap().insert(key);
    }

    pub fn delay_key(&self, key: KeyCode, delay: Duration) {
        self.delays.lock().unwrap().insert(key, delay);
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn publish_version(&self, version: &str) {
        *self.latest_version.lock().unwrap() = version.to_string();
    }

    pub fn commit_count(&self) -> usize {
        self.commits.lock().unwrap().len()
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(HotaiError::backend("host not responding"));
        }
        Ok(())
    }
}

#[async_trait]
impl NativeBackend for MockBackend {
    async fn query_modifier_catalog(&self) -> Result<ModifierCatalog> {
        self.check_reachable()?;
        self.catalog_queries.fetch_add(1, Ordering::SeqCst);
        Ok([("Ctrl", CTRL), ("Shift", SHIFT)].into_iter().collect())
    }

    async fn query_key_catalog(&self) -> Result<KeyCatalog> {
        self.check_reachable()?;
        self.catalog_queries.fetch_add(1, Ordering::SeqCst);
        Ok([("Space", SPACE), ("A", KEY_A), ("K", KEY_K)].into_iter().collect())
    }

    async fn commit_hotkey(&self, modifiers: &[ModifierFlag], key: KeyCode) -> Result<()> {
        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_reachable()?;
        if self.taken.lock().unwrap().contains(&key) {
            return Err(HotaiError::hotkey_rejected("shortcut already registered by another application"));
        }
        self.commits.lock().unwrap().push((modifiers.to_vec(), key));
        *self.installed.lock().unwrap() = Some((modifiers.to_vec(), key));
        Ok(())
    }

    async fn unregister_hotkey(&self) -> Result<()> {
        self.check_reachable()?;
        self.unregisters.fetch_add(1, Ordering::SeqCst);
        *self.installed.lock().unwrap() = None;
        Ok(())
    }

    async fn set_window_bounds(&self, bounds: WindowBounds) -> Result<()> {
        self.check_reachable()?;
        self.bounds.lock().unwrap().push(bounds);
        Ok(())
    }

    async fn get_autostart_enabled(&self) -> Result<bool> {
        self.check_reachable()?;
        Ok(self.autostart.load(Ordering::SeqCst))
    }

    async fn set_autostart_enabled(&self, enabled: bool) -> Result<()> {
        self.check_reachable()?;
        self.autostart.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    async fn check_for_update(&self) -> Result<UpdateInfo> {
        self.check_reachable()?;
        let latest = self.latest_version.lock().unwrap().clone();
        Ok(UpdateInfo {
            current_version: "1.0.0".to_string(),
            latest_version: latest.clone(),
            name: format!("Hot AI {}", latest),
            url: format!("https://example.com/releases/{}", latest),
        })
    }
}
