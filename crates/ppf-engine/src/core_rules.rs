//! Built-in vendor rules and downgrade rules.
//!
//! ## Vendor rules
//! One group per vendor, each gated feature switched on from the first
//! release that supports it:
//!
//! | Vendor | IEEE arithmetic | `storage_size` | `iso_fortran_env` kinds |
//! |--------|-----------------|----------------|-------------------------|
//! | GNU    | 5.0             | 4.6            | 4.5                     |
//! | Intel  | 11.1            | 17.1           | 16.4                    |
//! | NAG    | 5.0             | 5.3            | 5.3                     |
//! | PGI    | 11.1            | 15.4           | 14.1                    |
//! | IBM XL | 13.1            | 15.2           | 14.1                    |
//!
//! GNU additionally turns IEEE arithmetic back off when quadruple real
//! precision is selected (`gnu.ieee-arithmetic-no-quad`). The rule reads
//! `real_precision` after the quad-availability cap.
//!
//! ## Downgrade rules
//! - `quad-precision-unavailable`: caps `real_precision` at 64 when
//!   `qp_available` is 0

use ppf_core::{Feature, FlagValue, MAX_PORTABLE_PRECISION, Vendor, Version};

use crate::rules::{Condition, Rule};
use crate::validator::{Adjustment, DowngradeRule};

/// IDs of the built-in downgrade rules, in application order.
pub const DOWNGRADE_RULE_IDS: &[&str] = &["quad-precision-unavailable"];

/// Build the built-in vendor rule table.
pub fn default_rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(gnu_rules());
    rules.extend(intel_rules());
    rules.extend(nag_rules());
    rules.extend(pgi_rules());
    rules.extend(ibm_rules());
    rules
}

/// Build the built-in downgrade rules.
pub fn default_downgrades() -> Vec<DowngradeRule> {
    vec![quad_precision_unavailable()]
}

fn enable(id: &str, vendor: Vendor, major: u32, minor: u32, feature: Feature) -> Rule {
    Rule::new(
        id,
        vendor,
        Version::new(major, minor),
        feature,
        FlagValue::Switch(true),
    )
}

/// The three standard-gated switches, one rule each.
fn gated(
    vendor: Vendor,
    ieee: (u32, u32),
    storage: (u32, u32),
    iso_env: (u32, u32),
) -> Vec<Rule> {
    let prefix = vendor.as_str();
    vec![
        enable(
            &format!("{prefix}.ieee-arithmetic"),
            vendor,
            ieee.0,
            ieee.1,
            Feature::UseIeeeArithmetic,
        ),
        enable(
            &format!("{prefix}.storage-size"),
            vendor,
            storage.0,
            storage.1,
            Feature::UseStorageSize,
        ),
        enable(
            &format!("{prefix}.iso-fortran-env-intreal"),
            vendor,
            iso_env.0,
            iso_env.1,
            Feature::UseIsoFortranEnvIntreal,
        ),
    ]
}

fn gnu_rules() -> Vec<Rule> {
    let mut rules = gated(Vendor::Gnu, (5, 0), (4, 6), (4, 5));
    // gfortran's ieee_arithmetic has no support for real(16).
    rules.push(
        Rule::new(
            "gnu.ieee-arithmetic-no-quad",
            Vendor::Gnu,
            Version::ZERO,
            Feature::UseIeeeArithmetic,
            FlagValue::Switch(false),
        )
        .when(Condition::AtLeast(
            Feature::RealPrecision,
            MAX_PORTABLE_PRECISION + 1,
        )),
    );
    rules
}

fn intel_rules() -> Vec<Rule> {
    gated(Vendor::Intel, (11, 1), (17, 1), (16, 4))
}

fn nag_rules() -> Vec<Rule> {
    gated(Vendor::Nag, (5, 0), (5, 3), (5, 3))
}

fn pgi_rules() -> Vec<Rule> {
    gated(Vendor::Pgi, (11, 1), (15, 4), (14, 1))
}

fn ibm_rules() -> Vec<Rule> {
    gated(Vendor::IbmXl, (13, 1), (15, 2), (14, 1))
}

/// Downgrade: quad precision requested but not available.
fn quad_precision_unavailable() -> DowngradeRule {
    DowngradeRule {
        id: "quad-precision-unavailable".into(),
        description: "quadruple precision is not available; falling back to double".into(),
        feature: Feature::RealPrecision,
        when: vec![Condition::Equals(
            Feature::QpAvailable,
            FlagValue::Switch(false),
        )],
        adjustment: Adjustment::CapAt(MAX_PORTABLE_PRECISION),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
