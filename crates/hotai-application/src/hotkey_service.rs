//! Global shortcut use cases.
//!
//! The settings store only ever adopts a binding the native backend has
//! accepted, and clearing the binding goes through the backend as well.
//! Requests are sequenced with tickets: when two overlap, the response of the
//! older one is discarded once it arrives. Backend calls are issued one at a
//! time in ticket order, so the OS hook ends up matching the newest request.

use hotai_core::backend::NativeBackend;
use hotai_core::error::{HotaiError, Result};
use hotai_core::hotkey::{HotKeyBinding, KeyCatalog, ModifierCatalog};
use hotai_core::settings::Settings;
use hotai_core::store::Store;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, OnceCell};

/// Outcome of a successful [`HotkeyService::commit`] or [`HotkeyService::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The backend accepted the change and settings now reflect it
    Applied,
    /// A newer request was issued while this one was pending; its response
    /// was discarded (or the call skipped) and settings were not touched
    Superseded,
}

/// Modifier and key catalogs of the running backend.
#[derive(Debug, Clone, Default)]
pub struct HotkeyCatalogs {
    pub modifiers: ModifierCatalog,
    pub keys: KeyCatalog,
}

pub struct HotkeyService {
    backend: Arc<dyn NativeBackend>,
    settings: Store<Settings>,
    latest_ticket: AtomicU64,
    /// Held across each backend hotkey call and the settings update after it
    backend_gate: Mutex<()>,
    catalogs: OnceCell<HotkeyCatalogs>,
}

impl HotkeyService {
    pub fn new(backend: Arc<dyn NativeBackend>, settings: Store<Settings>) -> Self {
        Self {
            backend,
            settings,
            latest_ticket: AtomicU64::new(0),
            backend_gate: Mutex::new(()),
            catalogs: OnceCell::new(),
        }
    }

    /// Queries both catalogs on first use and caches them.
    pub async fn catalogs(&self) -> Result<&HotkeyCatalogs> {
        self.catalogs
            .get_or_try_init(|| async {
                let modifiers = self.backend.query_modifier_catalog().await?;
                let keys = self.backend.query_key_catalog().await?;
                tracing::debug!(
                    "[Hotkey] Catalogs loaded: {} modifiers, {} keys",
                    modifiers.len(),
                    keys.len()
                );
                Ok::<_, HotaiError>(HotkeyCatalogs { modifiers, keys })
            })
            .await
    }

    /// Builds a binding from catalog names such as `(["Ctrl"], "Space")`.
    pub async fn binding_from_names<S: AsRef<str>>(
        &self,
        modifier_names: &[S],
        key_name: &str,
    ) -> Result<HotKeyBinding> {
        let catalogs = self.catalogs().await?;
        HotKeyBinding::from_names(modifier_names, key_name, &catalogs.modifiers, &catalogs.keys)
    }

    /// Human-readable form of the current binding, if any.
    pub async fn describe_current(&self) -> Result<Option<String>> {
        let Some(binding) = self.current() else {
            return Ok(None);
        };
        let catalogs = self.catalogs().await?;
        Ok(Some(binding.display(&catalogs.modifiers, &catalogs.keys)))
    }

    pub fn current(&self) -> Option<HotKeyBinding> {
        self.settings.with(|s| s.hot_key.clone())
    }

    /// Installs `binding` with the backend, then stores it.
    ///
    /// # Returns
    ///
    /// - `Ok(CommitOutcome::Applied)`: accepted and persisted
    /// - `Ok(CommitOutcome::Superseded)`: a later commit owns the outcome
    /// - `Err(HotaiError::HotkeyRejected)`: the backend refused; settings unchanged
    /// - `Err(HotaiError::Storage)`: accepted, but persisting failed
    pub async fn commit(&self, binding: HotKeyBinding) -> Result<CommitOutcome> {
        let ticket = self.issue_ticket();
        tracing::debug!("[Hotkey] Commit #{} requested: {:?}", ticket, binding);

        let _gate = self.backend_gate.lock().await;
        if !self.is_latest(ticket) {
            tracing::debug!("[Hotkey] Commit #{} superseded before dispatch", ticket);
            return Ok(CommitOutcome::Superseded);
        }

        let response = self
            .backend
            .commit_hotkey(binding.modifiers(), binding.key())
            .await;

        if !self.is_latest(ticket) {
            tracing::debug!("[Hotkey] Commit #{} superseded, response discarded", ticket);
            return Ok(CommitOutcome::Superseded);
        }

        if let Err(e) = response {
            tracing::warn!("[Hotkey] Commit #{} rejected: {}", ticket, e);
            return Err(into_rejection(e));
        }

        self.settings.update(|s| s.hot_key = Some(binding))?;
        tracing::info!("[Hotkey] Commit #{} applied", ticket);
        Ok(CommitOutcome::Applied)
    }

    /// Re-registers the persisted binding with the backend.
    ///
    /// The OS-level hook does not survive a process restart, so this runs at
    /// start-up. A rejection is reported but the stored binding is kept.
    pub async fn restore(&self) -> Result<Option<HotKeyBinding>> {
        let Some(binding) = self.current() else {
            tracing::debug!("[Hotkey] No persisted binding to restore");
            return Ok(None);
        };
        let _gate = self.backend_gate.lock().await;
        match self
            .backend
            .commit_hotkey(binding.modifiers(), binding.key())
            .await
        {
            Ok(()) => {
                tracing::info!("[Hotkey] Restored persisted binding");
                Ok(Some(binding))
            }
            Err(e) => {
                tracing::warn!("[Hotkey] Persisted binding could not be restored: {}", e);
                Err(into_rejection(e))
            }
        }
    }

    /// Unregisters the shortcut with the backend, then removes the binding
    /// from settings. Commits still in flight are superseded.
    ///
    /// # Returns
    ///
    /// - `Ok(CommitOutcome::Applied)`: unregistered and persisted
    /// - `Ok(CommitOutcome::Superseded)`: a later request owns the outcome
    /// - `Err(HotaiError::Backend)`: the backend failed; settings unchanged
    pub async fn clear(&self) -> Result<CommitOutcome> {
        let ticket = self.issue_ticket();
        tracing::debug!("[Hotkey] Clear #{} requested", ticket);

        let _gate = self.backend_gate.lock().await;
        if !self.is_latest(ticket) {
            tracing::debug!("[Hotkey] Clear #{} superseded before dispatch", ticket);
            return Ok(CommitOutcome::Superseded);
        }

        if let Err(e) = self.backend.unregister_hotkey().await {
            tracing::warn!("[Hotkey] Clear #{} failed, binding kept: {}", ticket, e);
            return Err(e);
        }

        if !self.is_latest(ticket) {
            tracing::debug!("[Hotkey] Clear #{} superseded, response discarded", ticket);
            return Ok(CommitOutcome::Superseded);
        }

        self.settings.update(|s| s.hot_key = None)?;
        tracing::info!("[Hotkey] Clear #{} applied", ticket);
        Ok(CommitOutcome::Applied)
    }

    fn issue_ticket(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.latest_ticket.load(Ordering::SeqCst)
    }
}

fn into_rejection(err: HotaiError) -> HotaiError {
    match err {
        HotaiError::HotkeyRejected(_) => err,
        other => HotaiError::hotkey_rejected(other.to_string()),
    }
}
