//! Error types for flag resolution.
//!
//! Only hard errors live here. Soft conditions (an unknown vendor, an
//! unparsable version, an unavailable capability) are resolved internally and
//! are observable only through the resulting flag set and the trace.

use thiserror::Error;

use crate::types::feature::Feature;
use crate::types::flags::FlagValue;
use crate::types::identity::StandardLevel;

/// Caller-visible resolution failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// An override asks for a value that needs a newer standard than requested.
    #[error(
        "override {feature}={requested} requires {required}, but {standard} was requested"
    )]
    IncompatibleOverride {
        /// The overridden feature.
        feature: Feature,
        /// The value the override asked for.
        requested: FlagValue,
        /// The standard level of the request.
        standard: StandardLevel,
        /// The standard level the value needs.
        required: StandardLevel,
    },

    /// An override names a feature that does not exist.
    #[error("unknown feature: {name}")]
    UnknownFeature {
        /// The name as given.
        name: String,
    },

    /// An override value lies outside the feature's domain.
    #[error("invalid value {value:?} for {feature}: expected {expected}")]
    InvalidOverrideValue {
        /// The overridden feature.
        feature: Feature,
        /// The value as given.
        value: String,
        /// Description of accepted values.
        expected: String,
    },

    /// An override targets a feature computed from the request.
    #[error("{feature} is derived from the requested standard and cannot be overridden")]
    NotOverridable {
        /// The derived feature.
        feature: Feature,
    },

    /// The requested standard token is not recognized.
    #[error("unknown language standard: {token:?}")]
    UnknownStandard {
        /// The token as given.
        token: String,
    },
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incompatible_override_display_names_values() {
        let err = ResolveError::IncompatibleOverride {
            feature: Feature::UseStorageSize,
            requested: FlagValue::Switch(true),
            standard: StandardLevel::Std2003,
            required: StandardLevel::Std2008,
        };
        assert_eq!(
            err.to_string(),
            "override use_storage_size=1 requires Fortran 2008, but Fortran 2003 was requested"
        );
    }

    #[test]
    fn unknown_feature_display() {
        let err = ResolveError::UnknownFeature {
            name: "use_coarrays".into(),
        };
        assert_eq!(err.to_string(), "unknown feature: use_coarrays");
    }

    #[test]
    fn invalid_value_display() {
        let err = ResolveError::InvalidOverrideValue {
            feature: Feature::RealPrecision,
            value: "80".into(),
            expected: Feature::RealPrecision.domain_description(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"80\" for real_precision: expected one of 0, 32, 64, 128"
        );
    }

    #[test]
    fn unknown_standard_display() {
        let err = ResolveError::UnknownStandard {
            token: "f77".into(),
        };
        assert!(err.to_string().contains("\"f77\""));
    }
}
