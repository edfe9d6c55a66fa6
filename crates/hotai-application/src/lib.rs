//! Application layer for hot-ai.
//!
//! Use cases that coordinate the reactive stores with the native backend.

pub mod hotkey_service;
pub mod preset_service;
pub mod services;
pub mod system_service;
pub mod window_service;

pub use hotkey_service::{CommitOutcome, HotkeyCatalogs, HotkeyService};
pub use preset_service::PresetService;
pub use services::{AppServices, StartupReport};
pub use system_service::SystemService;
pub use window_service::WindowService;
