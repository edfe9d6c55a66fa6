//! Path resolution for the on-disk state directory.
//!
//! ```text
//! ~/.config/hot-ai/           # dirs::config_dir() + "hot-ai"
//! └── storage/                # FileKeyValueStore directory
//!     ├── settings.json
//!     ├── presets.json
//!     └── version.json
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the storage directory.
pub const STATE_DIR_ENV: &str = "HOTAI_STATE_DIR";

const APP_DIR: &str = "hot-ai";
const STORAGE_DIR: &str = "storage";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// No explicit directory was given and the platform has no config directory.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for hotai_core::HotaiError {
    fn from(err: PathError) -> Self {
        hotai_core::HotaiError::config(err.to_string())
    }
}

/// Resolves where persisted state lives.
///
/// Precedence: an explicit base directory, then `$HOTAI_STATE_DIR`, then
/// the platform config directory.
#[derive(Debug, Clone, Default)]
pub struct HotaiPaths {
    base: Option<PathBuf>,
}

impl HotaiPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Directory the file-backed key-value store writes into.
    pub fn storage_dir(&self) -> Result<PathBuf, PathError> {
        resolve(
            self.base.as_deref(),
            std::env::var_os(STATE_DIR_ENV),
            dirs::config_dir(),
        )
    }
}

fn resolve(
    base: Option<&Path>,
    env: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, PathError> {
    if let Some(base) = base {
        return Ok(base.to_path_buf());
    }
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    config_dir
        .map(|dir| dir.join(APP_DIR).join(STORAGE_DIR))
        .ok_or(PathError::ConfigDirNotFound)
}
