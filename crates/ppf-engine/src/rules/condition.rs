//! Conditions over already-resolved flags.
//!
//! Used by vendor rules (e.g. "only while real precision is at most 64") and
//! by downgrade rules. A condition reads exactly one feature.

use std::fmt;

use ppf_core::{Feature, FlagSet, FlagValue};

/// A predicate over one feature's current value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// The feature's integer value is `<=` the bound.
    AtMost(Feature, i64),
    /// The feature's integer value is `>=` the bound.
    AtLeast(Feature, i64),
    /// The feature holds exactly this value.
    Equals(Feature, FlagValue),
}

impl Condition {
    /// The feature this condition reads.
    pub fn feature(self) -> Feature {
        match self {
            Condition::AtMost(feature, _)
            | Condition::AtLeast(feature, _)
            | Condition::Equals(feature, _) => feature,
        }
    }

    /// Evaluate against a flag set.
    pub fn holds(self, flags: &FlagSet) -> bool {
        match self {
            Condition::AtMost(feature, bound) => flags.get(feature).as_int() <= bound,
            Condition::AtLeast(feature, bound) => flags.get(feature).as_int() >= bound,
            Condition::Equals(feature, value) => flags.get(feature) == value,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::AtMost(feature, bound) => write!(f, "{feature} <= {bound}"),
            Condition::AtLeast(feature, bound) => write!(f, "{feature} >= {bound}"),
            Condition::Equals(feature, value) => write!(f, "{feature} == {value}"),
        }
    }
}
