//! Schema version gate.

use hotai_core::error::Result;
use hotai_core::storage::{KeyValueStore, VERSION_KEY, set_json};
use serde_json::Value;

/// Schema version written by this release.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Where persisted data stands relative to a target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    /// Stored version absent or below the target; migration must run.
    Unmigrated { stored: u32 },
    /// Stored version equals the target.
    Current,
    /// Stored version is above the target (data written by a newer release).
    Ahead { stored: u32 },
}

impl MigrationState {
    pub fn evaluate(stored: u32, target: u32) -> Self {
        use std::cmp::Ordering;
        match stored.cmp(&target) {
            Ordering::Less => MigrationState::Unmigrated { stored },
            Ordering::Equal => MigrationState::Current,
            Ordering::Greater => MigrationState::Ahead { stored },
        }
    }
}

/// Reads the stored schema version. Absent or unreadable means 0.
pub fn read_version(store: &dyn KeyValueStore) -> Result<u32> {
    let Some(raw) = store.get(VERSION_KEY)? else {
        return Ok(0);
    };
    Ok(parse_version(&raw).unwrap_or_else(|| {
        tracing::warn!("[Migration] Unreadable schema version {:?}, treating as 0", raw);
        0
    }))
}

pub fn write_version(store: &dyn KeyValueStore, version: u32) -> Result<()> {
    set_json(store, VERSION_KEY, &version)
}

/// Accepts `1`, `"1"` and `1.0`; anything else, including negatives, is `None`.
fn parse_version(raw: &str) -> Option<u32> {
    match serde_json::from_str::<Value>(raw.trim()).ok()? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    #[test]
    fn test_evaluate_states() {
        assert_eq!(MigrationState::evaluate(0, 1), MigrationState::Unmigrated { stored: 0 });
        assert_eq!(MigrationState::evaluate(1, 1), MigrationState::Current);
        assert_eq!(MigrationState::evaluate(3, 1), MigrationState::Ahead { stored: 3 });
    }

    #[test]
    fn test_parse_version_forms() {
        assert_eq!(parse_version("1"), Some(1));
        assert_eq!(parse_version(" 2 "), Some(2));
        assert_eq!(parse_version("\"3\""), Some(3));
        assert_eq!(parse_version("1.0"), Some(1));
        assert_eq!(parse_version("1.5"), None);
        assert_eq!(parse_version("-1"), None);
        assert_eq!(parse_version("null"), None);
        assert_eq!(parse_version("undefined"), None);
    }

    #[test]
    fn test_read_missing_and_garbage_as_zero() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(read_version(&store).unwrap(), 0);
        store.set_raw(VERSION_KEY, "true").unwrap();
        assert_eq!(read_version(&store).unwrap(), 0);
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryKeyValueStore::new();
        write_version(&store, CURRENT_SCHEMA_VERSION).unwrap();
        assert_eq!(store.get(VERSION_KEY).unwrap().as_deref(), Some("1"));
        assert_eq!(read_version(&store).unwrap(), 1);
    }
}
