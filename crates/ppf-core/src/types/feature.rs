//! Feature catalog.
//!
//! Every capability flag the resolver knows about, with its emitted name,
//! value domain, documented default, and the minimum language standard needed
//! to enable it. Declaration order is the fixed evaluation order and the
//! emission order: a feature may only depend on features declared before it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ResolveError, Result};
use crate::types::flags::FlagValue;
use crate::types::identity::StandardLevel;

/// Integer kinds accepted by `__INTEGER_KIND__` (0 = default `INTEGER`).
pub const INTEGER_KINDS: &[i64] = &[0, 16, 32, 64];

/// Real precisions accepted by `__REAL_PRECISION__` (0 = default `REAL`).
pub const REAL_PRECISIONS: &[i64] = &[0, 32, 64, 128];

/// Widest real precision guaranteed without quad-precision support.
pub const MAX_PORTABLE_PRECISION: i64 = 64;

/// Value domain of a feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    /// Boolean switch, emitted as 0/1.
    Switch,
    /// Integer drawn from a fixed set.
    Choice(&'static [i64]),
    /// Computed from the request; never set by rules or overrides.
    Derived,
}

/// A capability flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// `__DEBUGGING__`
    Debugging,
    /// `__FORTRAN_STANDARD__`, the requested standard's year.
    FortranStandard,
    /// `__USE_INTRINSIC_ALGEBRA__`: use intrinsics such as `matmul`.
    UseIntrinsicAlgebra,
    /// `__USE_POWELL_ALGEBRA__`: use Powell's linear algebra procedures.
    UsePowellAlgebra,
    /// `__INTEGER_KIND__`
    IntegerKind,
    /// `__QP_AVAILABLE__`: quad precision (`REAL128`) is usable.
    QpAvailable,
    /// `__REAL_PRECISION__`
    RealPrecision,
    /// `__USE_IEEE_ARITHMETIC__` (Fortran 2003).
    UseIeeeArithmetic,
    /// `__USE_STORAGE_SIZE__` (Fortran 2008).
    UseStorageSize,
    /// `__USE_ISO_FORTRAN_ENV_INTREAL__` (Fortran 2008).
    UseIsoFortranEnvIntreal,
}

impl Feature {
    /// Number of features.
    pub const COUNT: usize = 10;

    /// All features in evaluation order.
    pub const ALL: [Feature; Self::COUNT] = [
        Feature::Debugging,
        Feature::FortranStandard,
        Feature::UseIntrinsicAlgebra,
        Feature::UsePowellAlgebra,
        Feature::IntegerKind,
        Feature::QpAvailable,
        Feature::RealPrecision,
        Feature::UseIeeeArithmetic,
        Feature::UseStorageSize,
        Feature::UseIsoFortranEnvIntreal,
    ];

    /// Position in evaluation order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case identifier.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Debugging => "debugging",
            Feature::FortranStandard => "fortran_standard",
            Feature::UseIntrinsicAlgebra => "use_intrinsic_algebra",
            Feature::UsePowellAlgebra => "use_powell_algebra",
            Feature::IntegerKind => "integer_kind",
            Feature::QpAvailable => "qp_available",
            Feature::RealPrecision => "real_precision",
            Feature::UseIeeeArithmetic => "use_ieee_arithmetic",
            Feature::UseStorageSize => "use_storage_size",
            Feature::UseIsoFortranEnvIntreal => "use_iso_fortran_env_intreal",
        }
    }

    /// Name consumed by the downstream preprocessor.
    pub fn macro_name(self) -> &'static str {
        match self {
            Feature::Debugging => "__DEBUGGING__",
            Feature::FortranStandard => "__FORTRAN_STANDARD__",
            Feature::UseIntrinsicAlgebra => "__USE_INTRINSIC_ALGEBRA__",
            Feature::UsePowellAlgebra => "__USE_POWELL_ALGEBRA__",
            Feature::IntegerKind => "__INTEGER_KIND__",
            Feature::QpAvailable => "__QP_AVAILABLE__",
            Feature::RealPrecision => "__REAL_PRECISION__",
            Feature::UseIeeeArithmetic => "__USE_IEEE_ARITHMETIC__",
            Feature::UseStorageSize => "__USE_STORAGE_SIZE__",
            Feature::UseIsoFortranEnvIntreal => "__USE_ISO_FORTRAN_ENV_INTREAL__",
        }
    }

    /// Value domain.
    pub fn kind(self) -> FeatureKind {
        match self {
            Feature::FortranStandard => FeatureKind::Derived,
            Feature::IntegerKind => FeatureKind::Choice(INTEGER_KINDS),
            Feature::RealPrecision => FeatureKind::Choice(REAL_PRECISIONS),
            Feature::Debugging
            | Feature::UseIntrinsicAlgebra
            | Feature::UsePowellAlgebra
            | Feature::QpAvailable
            | Feature::UseIeeeArithmetic
            | Feature::UseStorageSize
            | Feature::UseIsoFortranEnvIntreal => FeatureKind::Switch,
        }
    }

    /// Value assumed before any rule fires.
    ///
    /// | Feature | Default |
    /// |---------|---------|
    /// | `debugging`, `use_intrinsic_algebra`, `use_powell_algebra` | 0 |
    /// | `integer_kind` | 0 (default `INTEGER`) |
    /// | `qp_available` | 0 |
    /// | `real_precision` | 64 |
    /// | gated switches | 0 |
    /// | `fortran_standard` | the requested standard's year |
    ///
    /// These are the documented defaults of `ppf.h`. The shipped header
    /// defines `__DEBUGGING__`, `__USE_INTRINSIC_ALGEBRA__` and
    /// `__USE_POWELL_ALGEBRA__` as 1 instead; pass overrides to reproduce it.
    pub fn default_value(self, standard: StandardLevel) -> FlagValue {
        match self {
            Feature::FortranStandard => FlagValue::Int(standard.year()),
            Feature::IntegerKind => FlagValue::Int(0),
            Feature::RealPrecision => FlagValue::Int(MAX_PORTABLE_PRECISION),
            _ => FlagValue::Switch(false),
        }
    }

    /// Value forced by the standard floor. Switches are turned off; other
    /// kinds fall back to their default.
    pub fn disabled_value(self, standard: StandardLevel) -> FlagValue {
        match self.kind() {
            FeatureKind::Switch => FlagValue::Switch(false),
            FeatureKind::Choice(_) | FeatureKind::Derived => self.default_value(standard),
        }
    }

    /// Minimum standard needed to enable this feature, if it is gated.
    pub fn required_standard(self) -> Option<StandardLevel> {
        match self {
            Feature::UseIeeeArithmetic => Some(StandardLevel::Std2003),
            Feature::UseStorageSize | Feature::UseIsoFortranEnvIntreal => {
                Some(StandardLevel::Std2008)
            }
            _ => None,
        }
    }

    /// Minimum standard needed for this feature to hold `value`.
    ///
    /// The disabled value never requires anything.
    pub fn requirement_for(self, value: FlagValue, standard: StandardLevel) -> Option<StandardLevel> {
        if value == self.disabled_value(standard) {
            None
        } else {
            self.required_standard()
        }
    }

    /// True if users may override this feature.
    pub fn is_overridable(self) -> bool {
        self.kind() != FeatureKind::Derived
    }

    /// True if `value` lies in this feature's domain.
    pub fn accepts(self, value: FlagValue) -> bool {
        match (self.kind(), value) {
            (FeatureKind::Switch, FlagValue::Switch(_)) => true,
            (FeatureKind::Choice(domain), FlagValue::Int(n)) => domain.contains(&n),
            (FeatureKind::Derived, FlagValue::Int(year)) => StandardLevel::from_year(year).is_some(),
            _ => false,
        }
    }

    /// Human-readable description of the accepted values.
    pub fn domain_description(self) -> String {
        match self.kind() {
            FeatureKind::Switch => "0 or 1".to_string(),
            FeatureKind::Choice(domain) => {
                let values: Vec<String> = domain.iter().map(ToString::to_string).collect();
                format!("one of {}", values.join(", "))
            }
            FeatureKind::Derived => "the requested standard".to_string(),
        }
    }

    /// Look up a feature by name.
    ///
    /// Accepts the snake-case name, the bare macro name, or the full macro
    /// name, case-insensitively: `use_storage_size`, `USE_STORAGE_SIZE`,
    /// `__USE_STORAGE_SIZE__`.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().trim_matches('_').to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.name() == normalized)
    }

    /// Parse a raw value token into this feature's domain.
    ///
    /// Switches accept `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`.
    pub fn parse_value(self, raw: &str) -> Result<FlagValue> {
        let invalid = || ResolveError::InvalidOverrideValue {
            feature: self,
            value: raw.to_string(),
            expected: self.domain_description(),
        };

        match self.kind() {
            FeatureKind::Derived => Err(ResolveError::NotOverridable { feature: self }),
            FeatureKind::Switch => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(FlagValue::Switch(true)),
                "0" | "false" | "no" | "off" => Ok(FlagValue::Switch(false)),
                _ => Err(invalid()),
            },
            FeatureKind::Choice(domain) => {
                let n: i64 = raw.trim().parse().map_err(|_| invalid())?;
                if domain.contains(&n) {
                    Ok(FlagValue::Int(n))
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
