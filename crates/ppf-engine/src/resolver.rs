//! Primary resolution: defaults, vendor rules, standard floors, overrides.
//!
//! Features are resolved one at a time in declaration order. For each one:
//!
//! 1. start from the feature's default;
//! 2. apply every matching vendor rule in table order (last match wins);
//! 3. if the requested standard is below the feature's floor, or below the
//!    minimum declared by any matching rule, force the disabled value;
//! 4. apply the user override, failing if it needs a newer standard than
//!    was requested;
//! 5. apply the downgrade rules adjusting the feature, when a [`Validator`]
//!    is attached.
//!
//! A feature is fully settled (override and downgrades included) before the
//! next one is looked at, so rule conditions always read final values.

use ppf_core::{
    Feature, FeatureKind, FlagSet, ResolutionRequest, ResolveError, Result, StandardLevel,
};
use tracing::debug;

use crate::rules::RuleSet;
use crate::trace::{Phase, Trace};
use crate::validator::Validator;

/// Resolves a request against a rule table.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'r> {
    rules: &'r RuleSet,
    validator: Option<&'r Validator>,
}

impl<'r> Resolver<'r> {
    /// Create a resolver over `rules`, without downgrades.
    pub fn new(rules: &'r RuleSet) -> Self {
        Self {
            rules,
            validator: None,
        }
    }

    /// Settle each feature's downgrades before resolving the next feature.
    #[must_use]
    pub fn with_validator(mut self, validator: &'r Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Resolve `request` into a complete flag set.
    pub fn resolve(&self, request: &ResolutionRequest) -> Result<FlagSet> {
        self.resolve_traced(request, &mut Trace::new())
    }

    /// Resolve `request`, recording every step in `trace`.
    pub fn resolve_traced(
        &self,
        request: &ResolutionRequest,
        trace: &mut Trace,
    ) -> Result<FlagSet> {
        let identity = request.identity;
        let standard = request.standard;
        let mut flags = FlagSet::defaults(standard);

        if !identity.vendor.is_known() {
            debug!(identity = %identity, "no vendor rules apply, using conservative defaults");
        }

        for feature in Feature::ALL {
            let mut value = feature.default_value(standard);
            trace.record(Phase::Init, feature, value, "default");
            if feature.kind() == FeatureKind::Derived {
                continue;
            }

            let mut floor: Option<StandardLevel> = feature.required_standard();

            for rule in self.rules.for_feature(feature) {
                if !rule.matches(&identity, &flags) {
                    continue;
                }
                debug!(rule_id = %rule.id, feature = %feature, value = %rule.value, "rule matched");
                value = rule.value;
                floor = floor.max(Some(rule.min_standard));
                trace.record(Phase::VendorDetect, feature, value, rule.id.as_str());
            }

            if let Some(required) = floor {
                let disabled = feature.disabled_value(standard);
                if standard < required && value != disabled {
                    debug!(
                        feature = %feature,
                        standard = %standard,
                        required = %required,
                        "below standard floor, disabling"
                    );
                    value = disabled;
                    trace.record(Phase::StandardFloor, feature, value, "floor");
                }
            }

            if let Some(requested) = request.overrides.get(feature) {
                if let Some(required) = feature.requirement_for(requested, standard) {
                    if standard < required {
                        return Err(ResolveError::IncompatibleOverride {
                            feature,
                            requested,
                            standard,
                            required,
                        });
                    }
                }
                debug!(feature = %feature, value = %requested, "override applied");
                value = requested;
                trace.record(Phase::Override, feature, value, "override");
            }

            flags = flags.with(feature, value);
            if let Some(validator) = self.validator {
                flags = validator.settle_traced(feature, flags, trace);
            }
        }

        Ok(flags)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
