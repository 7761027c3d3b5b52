//! Vendor feature rules and the ordered rule table.
//!
//! A [`Rule`] says: for this vendor at or above this version (and while its
//! conditions hold), this feature takes this value. The [`RuleSet`] keeps
//! rules in table order; for each feature the resolver walks the matching
//! rules in that order and the last match wins. Adding support for a vendor
//! or version means appending rules, never touching the resolver.

pub mod condition;

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use ppf_core::{CompilerIdentity, Feature, FlagSet, FlagValue, StandardLevel, Vendor, Version};

use crate::core_rules::default_rules;
use crate::errors::{EngineError, Result};

pub use condition::Condition;

/// A conditional feature rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Unique rule identifier (e.g. `gnu.storage-size`).
    pub id: String,
    /// Vendor the rule applies to.
    pub vendor: Vendor,
    /// Lowest matching compiler version (inclusive).
    pub min_version: Version,
    /// Feature this rule sets.
    pub feature: Feature,
    /// Value assigned when the rule matches.
    pub value: FlagValue,
    /// Minimum standard the feature requires when set by this rule.
    pub min_standard: StandardLevel,
    /// Extra conditions over features resolved earlier.
    pub conditions: Vec<Condition>,
}

impl Rule {
    /// Create a rule; the minimum standard defaults to the feature's floor.
    pub fn new(
        id: impl Into<String>,
        vendor: Vendor,
        min_version: Version,
        feature: Feature,
        value: FlagValue,
    ) -> Self {
        Self {
            id: id.into(),
            vendor,
            min_version,
            feature,
            value,
            min_standard: feature
                .required_standard()
                .unwrap_or(StandardLevel::LOWEST),
            conditions: Vec::new(),
        }
    }

    /// Add a condition.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Declare a minimum standard other than the feature's floor.
    #[must_use]
    pub fn requires(mut self, standard: StandardLevel) -> Self {
        self.min_standard = standard;
        self
    }

    /// True if the rule fires for `identity` given the flags resolved so far.
    ///
    /// The unknown vendor never matches.
    pub fn matches(&self, identity: &CompilerIdentity, flags: &FlagSet) -> bool {
        identity.vendor.is_known()
            && identity.vendor == self.vendor
            && identity.version >= self.min_version
            && self.conditions.iter().all(|c| c.holds(flags))
    }

    /// Check that the rule is well formed.
    pub fn validate(&self) -> Result<()> {
        if !self.vendor.is_known() {
            return Err(EngineError::invalid_rule(
                &self.id,
                "rules cannot target the unknown vendor",
            ));
        }
        if !self.feature.is_overridable() {
            return Err(EngineError::invalid_rule(
                &self.id,
                format!("{} is derived and cannot be set by rules", self.feature),
            ));
        }
        if !self.feature.accepts(self.value) {
            return Err(EngineError::invalid_rule(
                &self.id,
                format!(
                    "value {} for {} is not {}",
                    self.value,
                    self.feature,
                    self.feature.domain_description()
                ),
            ));
        }
        for condition in &self.conditions {
            if condition.feature() >= self.feature {
                return Err(EngineError::invalid_rule(
                    &self.id,
                    format!(
                        "condition on {} is not resolved before {}",
                        condition.feature(),
                        self.feature
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Ordered, read-only table of rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

static BUILTIN: OnceLock<Arc<RuleSet>> = OnceLock::new();

impl RuleSet {
    /// Build a rule set, validating every rule and rejecting duplicate IDs.
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            rule.validate()?;
            if !seen.insert(rule.id.as_str()) {
                return Err(EngineError::invalid_rule(&rule.id, "duplicate rule id"));
            }
        }
        Ok(Self { rules })
    }

    /// The built-in vendor table, shared process-wide.
    pub fn builtin() -> Arc<RuleSet> {
        BUILTIN
            .get_or_init(|| Arc::new(RuleSet { rules: default_rules() }))
            .clone()
    }

    /// A copy of this set with `extra` appended after the existing rules.
    pub fn extend(&self, extra: impl IntoIterator<Item = Rule>) -> Result<Self> {
        let mut rules = self.rules.clone();
        rules.extend(extra);
        Self::new(rules)
    }

    /// Rules for `feature`, in table order.
    pub fn for_feature(&self, feature: Feature) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |rule| rule.feature == feature)
    }

    /// Look up a rule by ID.
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// All rules in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
