//! Fact collection: raw toolchain tokens to typed facts.
//!
//! The external probe hands over strings. This module turns them into a
//! [`CompilerIdentity`] and a [`StandardLevel`] with conservative fallbacks:
//! an unrecognized vendor becomes [`Vendor::Unknown`] and an unparsable
//! version becomes `0.0`. Neither is an error. Only an unrecognized standard
//! token is rejected, since guessing it would silently change the floors.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{ResolveError, Result};
use crate::types::identity::{CompilerIdentity, StandardLevel, Vendor, Version};

/// Raw toolchain identification as supplied by the probe.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawToolchain {
    /// Vendor token (`gfortran`, `__INTEL_COMPILER`, `nag`, …).
    pub vendor: String,
    /// Version string (`6.0`, `1710`, `53`, …).
    pub version: String,
    /// Requested standard token (`2003`, `f2008`, …). Empty means 2003.
    pub standard: String,
}

impl RawToolchain {
    /// Create raw facts from tokens.
    pub fn new(
        vendor: impl Into<String>,
        version: impl Into<String>,
        standard: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            version: version.into(),
            standard: standard.into(),
        }
    }
}

/// Typed facts for one resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Facts {
    /// Compiler in use.
    pub identity: CompilerIdentity,
    /// Requested language standard.
    pub standard: StandardLevel,
}

/// Normalizes raw toolchain tokens into [`Facts`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FactCollector;

impl FactCollector {
    /// Collect typed facts from raw tokens.
    pub fn collect(raw: &RawToolchain) -> Result<Facts> {
        let vendor = Vendor::parse(&raw.vendor);
        if !vendor.is_known() && !raw.vendor.trim().is_empty() {
            debug!(token = %raw.vendor, "unrecognized vendor, using conservative profile");
        }

        let version = match Version::parse_for(vendor, &raw.version) {
            Some(version) => version,
            None => {
                warn!(
                    vendor = %vendor,
                    version = %raw.version,
                    "unparsable compiler version, assuming 0.0"
                );
                Version::ZERO
            }
        };

        let standard = Self::standard(&raw.standard)?;

        let facts = Facts {
            identity: CompilerIdentity::new(vendor, version),
            standard,
        };
        debug!(identity = %facts.identity, standard = %facts.standard, "facts collected");
        Ok(facts)
    }

    /// Parse a requested-standard token; empty means the default standard.
    pub fn standard(token: &str) -> Result<StandardLevel> {
        if token.trim().is_empty() {
            return Ok(StandardLevel::default());
        }
        StandardLevel::parse(token).ok_or_else(|| ResolveError::UnknownStandard {
            token: token.to_string(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn collects_gnu_facts() {
        let facts = FactCollector::collect(&RawToolchain::new("gfortran", "6.0", "2003")).unwrap();
        assert_eq!(facts.identity.vendor, Vendor::Gnu);
        assert_eq!(facts.identity.version, Version::new(6, 0));
        assert_eq!(facts.standard, StandardLevel::Std2003);
    }

    #[test]
    fn collects_packed_intel_version() {
        let facts =
            FactCollector::collect(&RawToolchain::new("__INTEL_COMPILER", "1710", "f2008"))
                .unwrap();
        assert_eq!(facts.identity.vendor, Vendor::Intel);
        assert_eq!(facts.identity.version, Version::new(17, 1));
        assert_eq!(facts.standard, StandardLevel::Std2008);
    }

    #[test]
    fn unknown_vendor_is_not_an_error() {
        let facts = FactCollector::collect(&RawToolchain::new("lfortran", "0.30", "2008")).unwrap();
        assert_eq!(facts.identity.vendor, Vendor::Unknown);
        assert_eq!(facts.identity.version, Version::new(0, 30));
    }

    #[test]
    fn unparsable_version_becomes_zero() {
        let facts = FactCollector::collect(&RawToolchain::new("gnu", "trunk", "2003")).unwrap();
        assert_eq!(facts.identity.vendor, Vendor::Gnu);
        assert_eq!(facts.identity.version, Version::ZERO);
    }

    #[test]
    fn empty_standard_defaults_to_2003() {
        let facts = FactCollector::collect(&RawToolchain::new("gnu", "9.1", "")).unwrap();
        assert_eq!(facts.standard, StandardLevel::Std2003);
    }

    #[test]
    fn unknown_standard_is_rejected() {
        let err = FactCollector::collect(&RawToolchain::new("gnu", "9.1", "f77")).unwrap_err();
        assert_matches!(err, ResolveError::UnknownStandard { ref token } if token == "f77");
    }

    #[test]
    fn raw_toolchain_deserializes_partial_json() {
        let raw: RawToolchain = serde_json::from_str(r#"{"vendor": "nag"}"#).unwrap();
        assert_eq!(raw.vendor, "nag");
        assert!(raw.version.is_empty());
        assert!(raw.standard.is_empty());
    }
}
