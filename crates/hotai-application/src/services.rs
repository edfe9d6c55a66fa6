//! Service bundle wired to one [`ConfigService`] and one native backend.

use hotai_core::backend::NativeBackend;
use hotai_core::error::Result;
use hotai_infrastructure::ConfigService;
use std::sync::Arc;

use crate::hotkey_service::HotkeyService;
use crate::preset_service::PresetService;
use crate::system_service::SystemService;
use crate::window_service::WindowService;

/// What start-up managed to re-apply to the backend.
#[derive(Debug, Default)]
pub struct StartupReport {
    pub hotkey_restored: bool,
    pub bounds_restored: bool,
    /// Failures that did not stop start-up
    pub warnings: Vec<String>,
}

pub struct AppServices {
    pub config: ConfigService,
    pub hotkey: HotkeyService,
    pub presets: PresetService,
    pub window: WindowService,
    pub system: SystemService,
}

impl AppServices {
    pub fn new(config: ConfigService, backend: Arc<dyn NativeBackend>) -> Self {
        Self {
            hotkey: HotkeyService::new(Arc::clone(&backend), config.settings().clone()),
            presets: PresetService::new(config.presets().clone()),
            window: WindowService::new(Arc::clone(&backend), config.settings().clone()),
            system: SystemService::new(backend),
            config,
        }
    }

    /// Pushes persisted OS-level state back into the backend.
    ///
    /// Backend failures are collected into the report; only storage errors
    /// are returned.
    pub async fn startup(&self) -> Result<StartupReport> {
        let mut report = StartupReport::default();

        match self.hotkey.restore().await {
            Ok(restored) => report.hotkey_restored = restored.is_some(),
            Err(e) if e.is_backend() => report.warnings.push(e.to_string()),
            Err(e) => return Err(e),
        }

        match self.window.restore().await {
            Ok(restored) => report.bounds_restored = restored.is_some(),
            Err(e) if e.is_backend() => report.warnings.push(e.to_string()),
            Err(e) => return Err(e),
        }

        if !report.warnings.is_empty() {
            tracing::warn!("[Startup] Completed with {} warning(s)", report.warnings.len());
        }
        Ok(report)
    }
}
