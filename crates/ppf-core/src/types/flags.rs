//! Flag values and the complete flag set.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::feature::Feature;
use crate::types::identity::StandardLevel;

/// Value of a single feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlagValue {
    /// Boolean switch.
    Switch(bool),
    /// Bounded integer (kind, precision width, standard year).
    Int(i64),
}

impl FlagValue {
    /// Integer form consumed by the preprocessor (`0`/`1` for switches).
    pub fn as_int(self) -> i64 {
        match self {
            FlagValue::Switch(on) => i64::from(on),
            FlagValue::Int(n) => n,
        }
    }

    /// True for an enabled switch or a non-zero integer.
    pub fn is_enabled(self) -> bool {
        self.as_int() != 0
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_int())
    }
}

/// Complete mapping from feature to value.
///
/// Storage is one slot per [`Feature`], so every feature has exactly one
/// value by construction. Updates return a new set; there is no in-place
/// mutation through the public API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlagSet {
    values: [FlagValue; Feature::COUNT],
}

impl FlagSet {
    /// Every feature at its documented default for `standard`.
    pub fn defaults(standard: StandardLevel) -> Self {
        Self {
            values: Feature::ALL.map(|feature| feature.default_value(standard)),
        }
    }

    /// Value of `feature`.
    pub fn get(&self, feature: Feature) -> FlagValue {
        self.values[feature.index()]
    }

    /// True if `feature` is an enabled switch or a non-zero integer.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.get(feature).is_enabled()
    }

    /// Copy of this set with `feature` set to `value`.
    #[must_use]
    pub fn with(mut self, feature: Feature, value: FlagValue) -> Self {
        debug_assert!(
            feature.accepts(value),
            "{value} is outside the domain of {feature}"
        );
        self.values[feature.index()] = value;
        self
    }

    /// `(feature, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, FlagValue)> + '_ {
        Feature::ALL.iter().map(|&feature| (feature, self.get(feature)))
    }

    /// Features whose values differ between `self` and `other`.
    pub fn diff(&self, other: &FlagSet) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|&feature| self.get(feature) != other.get(feature))
            .collect()
    }
}

/// Serializes as `{ "__MACRO__": int, … }` in declaration order.
impl Serialize for FlagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Feature::COUNT))?;
        for (feature, value) in self.iter() {
            map.serialize_entry(feature.macro_name(), &value.as_int())?;
        }
        map.end()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
