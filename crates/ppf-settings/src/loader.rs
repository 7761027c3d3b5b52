//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PpfSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over the defaults
//! 3. Apply `PPF_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use ppf_core::{EmitFormat, FactCollector, Feature};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{LOG_LEVELS, PpfSettings};

/// Env var naming an explicit settings file.
pub const SETTINGS_PATH_VAR: &str = "PPF_SETTINGS";

/// Prefix of per-feature override env vars (`PPF_OVERRIDE_USE_STORAGE_SIZE=1`).
pub const OVERRIDE_PREFIX: &str = "PPF_OVERRIDE_";

/// Resolve the settings file path: `$PPF_SETTINGS`, else `~/.ppf/settings.json`.
pub fn settings_path() -> PathBuf {
    if let Some(explicit) = std::env::var_os(SETTINGS_PATH_VAR).filter(|p| !p.is_empty()) {
        return PathBuf::from(explicit);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".ppf").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PpfSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<PpfSettings> {
    let mut settings = load_file_layers(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults merged with the settings file, without env overrides.
pub fn load_file_layers(path: &Path) -> Result<PpfSettings> {
    let defaults = serde_json::to_value(PpfSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `PPF_*` overrides from the process environment.
pub fn apply_env_overrides(settings: &mut PpfSettings) {
    apply_env_overrides_from(settings, std::env::vars());
}

/// Apply `PPF_*` overrides from the given variables.
///
/// Recognized: `PPF_VENDOR`, `PPF_VERSION`, `PPF_STANDARD`,
/// `PPF_EMIT_FORMAT`, `PPF_LOG_LEVEL`, and `PPF_OVERRIDE_<FEATURE>`.
/// Invalid values are logged at `warn` and ignored, keeping the file or
/// default value. Empty values are ignored.
pub fn apply_env_overrides_from<I>(settings: &mut PpfSettings, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, val) in vars {
        if val.is_empty() {
            continue;
        }
        match key.as_str() {
            "PPF_VENDOR" => settings.toolchain.vendor = val,
            "PPF_VERSION" => settings.toolchain.version = val,
            "PPF_STANDARD" => {
                if FactCollector::standard(&val).is_ok() {
                    settings.toolchain.standard = val;
                } else {
                    warn!(key = %key, value = %val, "invalid standard env var, ignoring");
                }
            }
            "PPF_EMIT_FORMAT" => match EmitFormat::parse(&val) {
                Some(format) => settings.emit.format = format,
                None => warn!(key = %key, value = %val, "invalid emit format env var, ignoring"),
            },
            "PPF_LOG_LEVEL" => match parse_log_level(&val) {
                Some(level) => settings.logging.level = level,
                None => warn!(key = %key, value = %val, "invalid log level env var, ignoring"),
            },
            _ => {
                if let Some(name) = key.strip_prefix(OVERRIDE_PREFIX) {
                    apply_override_var(settings, &key, name, &val);
                }
            }
        }
    }
}

fn apply_override_var(settings: &mut PpfSettings, key: &str, name: &str, val: &str) {
    let Some(feature) = Feature::parse(name) else {
        warn!(key, "unknown feature in override env var, ignoring");
        return;
    };
    if let Err(err) = feature.parse_value(val) {
        warn!(key, value = %val, error = %err, "invalid override env var, ignoring");
        return;
    }
    // Drop file entries that spell the same feature differently.
    settings
        .overrides
        .retain(|existing, _| Feature::parse(existing) != Some(feature));
    let _ = settings
        .overrides
        .insert(feature.name().to_string(), Value::String(val.to_string()));
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a log level name, normalized to lowercase.
pub fn parse_log_level(val: &str) -> Option<String> {
    let level = val.trim().to_lowercase();
    LOG_LEVELS.contains(&level.as_str()).then_some(level)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
