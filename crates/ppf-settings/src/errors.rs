//! Settings error types.

use ppf_core::ResolveError;
use thiserror::Error;

/// Errors that can occur when loading settings or turning them into a request.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse JSON in the settings file.
    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A settings value has the wrong shape.
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
    /// The configured toolchain or overrides were rejected.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
