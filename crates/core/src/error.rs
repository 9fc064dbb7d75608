//! Shared error taxonomy for area loading and reconciliation.

use thiserror::Error;

/// Errors that can occur while loading area definitions or reconciling
/// platform state.
#[derive(Debug, Error)]
pub enum AreaError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Malformed configuration (bypass grammar, modes, duplicate names).
    /// The message always carries the offending raw key or value.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identity lookup failure. The message carries the org/slug pair.
    #[error("{0}")]
    Resolution(String),

    /// Platform create/update/delete/list failure.
    #[error("Platform operation failed: {0}")]
    Platform(String),
}

/// Result alias for area operations.
pub type Result<T> = std::result::Result<T, AreaError>;
