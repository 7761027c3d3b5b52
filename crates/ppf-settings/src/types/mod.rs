//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so partial
//! JSON is accepted and missing fields take their compiled default.

mod sections;

pub use sections::*;

use std::collections::BTreeMap;

use ppf_core::{FactCollector, Feature, Overrides, RawToolchain, ResolutionRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// # JSON Format
///
/// ```json
/// {
///   "toolchain": { "vendor": "gfortran", "version": "9.3", "standard": "2008" },
///   "overrides": { "debugging": true, "REAL_PRECISION": 32 },
///   "emit": { "format": "defines" },
///   "logging": { "level": "debug" }
/// }
/// ```
///
/// Override keys accept any feature spelling. Values may be booleans,
/// integers, or string tokens.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PpfSettings {
    /// Raw toolchain tokens handed to the fact collector.
    pub toolchain: RawToolchain,
    /// Per-feature overrides keyed by feature name.
    pub overrides: BTreeMap<String, Value>,
    /// Output settings.
    pub emit: EmitSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl PpfSettings {
    /// Parse the override table.
    ///
    /// Naming one feature under two spellings is an error.
    pub fn parsed_overrides(&self) -> Result<Overrides> {
        let mut overrides = Overrides::new();
        let mut spellings: BTreeMap<Feature, &str> = BTreeMap::new();
        for (name, value) in &self.overrides {
            if let Some(feature) = Feature::parse(name) {
                if let Some(first) = spellings.insert(feature, name) {
                    return Err(SettingsError::InvalidValue(format!(
                        "override {feature} is given twice, as {first} and {name}"
                    )));
                }
            }
            let token = override_token(name, value)?;
            overrides.insert_raw(name, &token)?;
        }
        Ok(overrides)
    }

    /// Collect facts from the toolchain section and pair them with the
    /// parsed overrides.
    pub fn to_request(&self) -> Result<ResolutionRequest> {
        let facts = FactCollector::collect(&self.toolchain)?;
        Ok(ResolutionRequest::from_facts(facts, self.parsed_overrides()?))
    }

    /// Install the global tracing subscriber at the configured level.
    pub fn init_logging(&self) {
        ppf_core::logging::init_subscriber(&self.logging.level);
    }
}

fn override_token(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::Bool(enabled) => Ok(if *enabled { "1" } else { "0" }.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        other => Err(SettingsError::InvalidValue(format!(
            "override {name}: expected a boolean, integer, or string, got {other}"
        ))),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ppf_core::{FlagValue, ResolveError, StandardLevel, Vendor, Version};

    fn settings(json: &str) -> PpfSettings {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(settings("{}"), PpfSettings::default());
    }

    #[test]
    fn toolchain_to_request() {
        let s = settings(
            r#"{"toolchain": {"vendor": "gfortran", "version": "9.3", "standard": "f2008"}}"#,
        );
        let req = s.to_request().unwrap();
        assert_eq!(req.identity.vendor, Vendor::Gnu);
        assert_eq!(req.identity.version, Version::new(9, 3));
        assert_eq!(req.standard, StandardLevel::Std2008);
        assert!(req.overrides.is_empty());
    }

    #[test]
    fn default_settings_give_conservative_request() {
        let req = PpfSettings::default().to_request().unwrap();
        assert!(!req.identity.vendor.is_known());
        assert_eq!(req.standard, StandardLevel::Std2003);
    }

    #[test]
    fn override_values_of_every_json_shape() {
        let s = settings(
            r#"{"overrides": {"debugging": true, "__REAL_PRECISION__": 32, "integer_kind": "64"}}"#,
        );
        let overrides = s.parsed_overrides().unwrap();
        assert_eq!(overrides.get(Feature::Debugging), Some(FlagValue::Switch(true)));
        assert_eq!(overrides.get(Feature::RealPrecision), Some(FlagValue::Int(32)));
        assert_eq!(overrides.get(Feature::IntegerKind), Some(FlagValue::Int(64)));
    }

    #[test]
    fn structured_override_value_is_rejected() {
        let s = settings(r#"{"overrides": {"debugging": [1]}}"#);
        assert_matches!(s.parsed_overrides(), Err(SettingsError::InvalidValue(_)));
    }

    #[test]
    fn same_feature_under_two_spellings_is_rejected() {
        let s = settings(r#"{"overrides": {"debugging": true, "__DEBUGGING__": false}}"#);
        let err = s.parsed_overrides().unwrap_err();
        assert_matches!(err, SettingsError::InvalidValue(ref msg) if msg.contains("given twice"));
    }

    #[test]
    fn unknown_override_name_is_rejected() {
        let s = settings(r#"{"overrides": {"use_gpu": 1}}"#);
        assert_matches!(
            s.to_request(),
            Err(SettingsError::Resolve(ResolveError::UnknownFeature { .. }))
        );
    }

    #[test]
    fn derived_override_is_rejected() {
        let s = settings(r#"{"overrides": {"fortran_standard": 2008}}"#);
        assert_matches!(
            s.to_request(),
            Err(SettingsError::Resolve(ResolveError::NotOverridable { .. }))
        );
    }

    #[test]
    fn unknown_standard_is_rejected() {
        let s = settings(r#"{"toolchain": {"standard": "f77"}}"#);
        assert_matches!(
            s.to_request(),
            Err(SettingsError::Resolve(ResolveError::UnknownStandard { .. }))
        );
    }

    #[test]
    fn serializes_camel_case_round_trip() {
        let mut s = PpfSettings::default();
        s.toolchain = RawToolchain::new("nag", "7.1", "2018");
        let _ = s.overrides.insert("debugging".into(), Value::Bool(true));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["toolchain"]["vendor"], "nag");
        assert_eq!(json["emit"]["format"], "header");
        let back: PpfSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }
}
