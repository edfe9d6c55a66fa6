pub mod migrate;
pub mod preset;
pub mod settings;
pub mod show;

use anyhow::{Context, Result};
use hotai_infrastructure::{ConfigService, HotaiPaths};
use std::path::Path;

/// Opens persisted state, running migration if needed.
pub fn open_config(state_dir: Option<&Path>) -> Result<ConfigService> {
    let dir = HotaiPaths::new(state_dir)
        .storage_dir()
        .context("Failed to resolve state directory")?;
    tracing::debug!("[CLI] State directory: {}", dir.display());
    ConfigService::open_at(&dir)
        .with_context(|| format!("Failed to open state at {}", dir.display()))
}

/// Shows only the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
