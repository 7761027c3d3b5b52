//! # ppf-settings
//!
//! Layered configuration supplying the resolver's inputs.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`PpfSettings::default()`]
//! 2. **Settings file**: `$PPF_SETTINGS` or `~/.ppf/settings.json`, deep-merged over defaults
//! 3. **Environment variables**: `PPF_*` overrides (highest priority)
//!
//! [`PpfSettings::to_request`] runs fact collection and override parsing,
//! producing the request the engine resolves.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_env_overrides_from, deep_merge, load_file_layers, load_settings,
    load_settings_from_path, settings_path,
};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton, initialized on first access via [`get_settings`].
static SETTINGS: OnceLock<PpfSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from [`settings_path`] with env var
/// overrides. If loading fails, returns compiled defaults.
pub fn get_settings() -> &'static PpfSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// Returns the settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: PpfSettings) -> std::result::Result<(), PpfSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
