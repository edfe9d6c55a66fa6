//! Window state persisted in settings.

use hotai_core::backend::NativeBackend;
use hotai_core::error::Result;
use hotai_core::settings::{Settings, WindowBounds};
use hotai_core::store::Store;
use std::sync::Arc;

pub struct WindowService {
    backend: Arc<dyn NativeBackend>,
    settings: Store<Settings>,
}

impl WindowService {
    pub fn new(backend: Arc<dyn NativeBackend>, settings: Store<Settings>) -> Self {
        Self { backend, settings }
    }

    /// Records where the user moved or resized the window.
    pub fn record_bounds(&self, bounds: WindowBounds) -> Result<()> {
        self.settings.update(|s| s.bounds = Some(bounds))
    }

    pub fn set_always_on_top(&self, always_on_top: bool) -> Result<()> {
        self.settings.update(|s| s.always_on_top = Some(always_on_top))
    }

    pub fn set_maximized(&self, maximized: bool) -> Result<()> {
        self.settings.update(|s| s.is_maximized = Some(maximized))
    }

    /// Sends the persisted bounds to the backend, if any were recorded.
    pub async fn restore(&self) -> Result<Option<WindowBounds>> {
        let Some(bounds) = self.settings.with(|s| s.bounds) else {
            return Ok(None);
        };
        self.backend.set_window_bounds(bounds).await?;
        tracing::debug!(
            "[Window] Restored bounds {}x{} at ({}, {})",
            bounds.width,
            bounds.height,
            bounds.x,
            bounds.y
        );
        Ok(Some(bounds))
    }
}
