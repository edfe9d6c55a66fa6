//! Domain layer of the hot-ai state store.
//!
//! Holds the value types (settings, hotkey binding, presets), the observable
//! [`store::Store`] container and the two contracts the rest of the system
//! plugs into: [`storage::KeyValueStore`] for persistence and
//! [`backend::NativeBackend`] for the host process.

pub mod backend;
pub mod error;
pub mod hotkey;
pub mod preset;
pub mod settings;
pub mod storage;
pub mod store;

pub use error::{HotaiError, Result};
