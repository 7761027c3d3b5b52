//! Explicit per-feature user overrides.

use std::collections::BTreeMap;

use crate::errors::{ResolveError, Result};
use crate::types::feature::Feature;
use crate::types::flags::FlagValue;

/// Validated override values keyed by feature.
///
/// Every stored value lies in its feature's domain and names an overridable
/// feature; compatibility with the requested standard is checked later by the
/// resolver, which knows the standard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Overrides {
    values: BTreeMap<Feature, FlagValue>,
}

impl Overrides {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an override. A later insert for the same feature replaces the
    /// earlier one.
    pub fn insert(&mut self, feature: Feature, value: FlagValue) -> Result<()> {
        if !feature.is_overridable() {
            return Err(ResolveError::NotOverridable { feature });
        }
        if !feature.accepts(value) {
            return Err(ResolveError::InvalidOverrideValue {
                feature,
                value: value.to_string(),
                expected: feature.domain_description(),
            });
        }
        let _ = self.values.insert(feature, value);
        Ok(())
    }

    /// Builder form of [`Overrides::insert`].
    pub fn with(mut self, feature: Feature, value: FlagValue) -> Result<Self> {
        self.insert(feature, value)?;
        Ok(self)
    }

    /// Parse and set an override from raw name/value tokens.
    pub fn insert_raw(&mut self, name: &str, raw: &str) -> Result<()> {
        let feature = Feature::parse(name).ok_or_else(|| ResolveError::UnknownFeature {
            name: name.to_string(),
        })?;
        let value = feature.parse_value(raw)?;
        self.insert(feature, value)
    }

    /// Build overrides from raw `(name, value)` token pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut overrides = Self::new();
        for (name, raw) in pairs {
            overrides.insert_raw(name.as_ref(), raw.as_ref())?;
        }
        Ok(overrides)
    }

    /// Override for `feature`, if any.
    pub fn get(&self, feature: Feature) -> Option<FlagValue> {
        self.values.get(&feature).copied()
    }

    /// Overrides in feature declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, FlagValue)> + '_ {
        self.values.iter().map(|(&feature, &value)| (feature, value))
    }

    /// Number of overridden features.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
