//! Autostart and update checks. Both are owned by the native backend; this
//! service passes them through.

use hotai_core::backend::{NativeBackend, UpdateInfo};
use hotai_core::error::Result;
use std::sync::Arc;

pub struct SystemService {
    backend: Arc<dyn NativeBackend>,
}

impl SystemService {
    pub fn new(backend: Arc<dyn NativeBackend>) -> Self {
        Self { backend }
    }

    pub async fn autostart_enabled(&self) -> Result<bool> {
        self.backend.get_autostart_enabled().await
    }

    pub async fn set_autostart(&self, enabled: bool) -> Result<()> {
        self.backend.set_autostart_enabled(enabled).await?;
        tracing::info!("[System] Autostart {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    pub async fn check_for_update(&self) -> Result<UpdateInfo> {
        let info = self.backend.check_for_update().await?;
        if info.is_newer() {
            tracing::info!(
                "[System] Update available: {} -> {} ({})",
                info.current_version,
                info.latest_version,
                info.url
            );
        }
        Ok(info)
    }
}
