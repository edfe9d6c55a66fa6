//! Error types for the hot-ai state layer.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for every hot-ai crate.
///
/// Variants follow the failure taxonomy of the state layer: missing data is
/// never an error (callers substitute defaults), backend failures and
/// storage unavailability are.
#[derive(Error, Debug, Clone, Serialize)]
pub enum HotaiError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The persistence adapter could not complete a read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// A native backend call failed (transport or host error)
    #[error("Backend error: {0}")]
    Backend(String),

    /// The native backend refused to install a hotkey
    #[error("Hotkey rejected by backend: {0}")]
    HotkeyRejected(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HotaiError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a HotkeyRejected error
    pub fn hotkey_rejected(message: impl Into<String>) -> Self {
        Self::HotkeyRejected(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Check if the backend was involved (transport failure or rejection)
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::HotkeyRejected(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HotaiError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for HotaiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for HotaiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, HotaiError>`.
pub type Result<T> = std::result::Result<T, HotaiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = HotaiError::not_found("preset", "Poet");
        assert_eq!(err.to_string(), "Entity not found: preset 'Poet'");
        assert!(err.is_not_found());
        assert!(!err.is_backend());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: HotaiError = io.into();
        assert!(err.is_storage());
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: HotaiError = json_err.into();
        match err {
            HotaiError::Serialization { format, .. } => assert_eq!(format, "JSON"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_rejection_is_backend() {
        assert!(HotaiError::hotkey_rejected("taken").is_backend());
        assert!(HotaiError::backend("timeout").is_backend());
    }
}
