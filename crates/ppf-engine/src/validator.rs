//! Cross-feature consistency: downgrade rules applied after resolution.
//!
//! A [`DowngradeRule`] looks for one inconsistency and corrects it silently.
//! Rules run once, in order. A rule may not read a feature that a later rule
//! adjusts, nor one declared after the feature it adjusts; together with
//! idempotent adjustments this makes a single pass a fixpoint, so validating
//! an already-valid flag set changes nothing.
//!
//! The [`Resolver`](crate::Resolver) settles each feature's downgrades as
//! soon as the feature is resolved, so vendor rules for later features see
//! the corrected value. The final pass then only confirms the result.

use ppf_core::{Feature, FeatureKind, FlagSet, FlagValue};
use tracing::info;

use crate::core_rules::default_downgrades;
use crate::errors::{EngineError, Result};
use crate::rules::Condition;
use crate::trace::{Phase, Trace};

/// How a downgrade rule corrects its feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    /// Lower the integer value to at most this bound.
    CapAt(i64),
    /// Replace the value outright.
    Set(FlagValue),
}

impl Adjustment {
    fn apply(self, current: FlagValue) -> FlagValue {
        match self {
            Adjustment::CapAt(cap) if current.as_int() > cap => FlagValue::Int(cap),
            Adjustment::CapAt(_) => current,
            Adjustment::Set(value) => value,
        }
    }
}

/// A post-resolution correction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DowngradeRule {
    /// Unique identifier.
    pub id: String,
    /// Human-readable reason, logged when the rule fires.
    pub description: String,
    /// Feature the adjustment writes.
    pub feature: Feature,
    /// All must hold for the rule to fire.
    pub when: Vec<Condition>,
    /// The correction.
    pub adjustment: Adjustment,
}

impl DowngradeRule {
    /// True if every condition holds for `flags`.
    pub fn applies(&self, flags: &FlagSet) -> bool {
        self.when.iter().all(|c| c.holds(flags))
    }

    /// The corrected flag set, or `None` if the rule does not fire or
    /// changes nothing.
    pub fn apply(&self, flags: &FlagSet) -> Option<FlagSet> {
        if !self.applies(flags) {
            return None;
        }
        let current = flags.get(self.feature);
        let adjusted = self.adjustment.apply(current);
        (adjusted != current).then(|| flags.with(self.feature, adjusted))
    }

    fn validate(&self) -> Result<()> {
        let in_domain = match (self.feature.kind(), self.adjustment) {
            (FeatureKind::Derived, _) => {
                return Err(EngineError::invalid_rule(
                    &self.id,
                    format!("{} is derived and cannot be adjusted", self.feature),
                ));
            }
            (FeatureKind::Choice(domain), Adjustment::CapAt(cap)) => domain.contains(&cap),
            (FeatureKind::Switch, Adjustment::CapAt(_)) => false,
            (_, Adjustment::Set(value)) => self.feature.accepts(value),
        };
        if !in_domain {
            return Err(EngineError::invalid_rule(
                &self.id,
                format!(
                    "adjustment {:?} leaves {} outside {}",
                    self.adjustment,
                    self.feature,
                    self.feature.domain_description()
                ),
            ));
        }
        Ok(())
    }
}

/// Applies downgrade rules in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validator {
    rules: Vec<DowngradeRule>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Validator {
    /// Validator with the built-in downgrade rules.
    pub fn builtin() -> Self {
        Self {
            rules: default_downgrades(),
        }
    }

    /// Build a validator from custom rules.
    ///
    /// Rejects rules whose adjustment leaves the feature's domain, rules
    /// whose conditions read a feature resolved after the adjusted one, and
    /// rule lists where a condition reads a feature adjusted by a later rule.
    pub fn new(rules: Vec<DowngradeRule>) -> Result<Self> {
        for (i, rule) in rules.iter().enumerate() {
            rule.validate()?;
            if let Some(late) = rule
                .when
                .iter()
                .map(|c| c.feature())
                .find(|f| f.index() > rule.feature.index())
            {
                return Err(EngineError::invalid_rule(
                    &rule.id,
                    format!("reads {late} which is resolved after {}", rule.feature),
                ));
            }
            for later in &rules[i + 1..] {
                if rule.when.iter().any(|c| c.feature() == later.feature) {
                    return Err(EngineError::invalid_rule(
                        &rule.id,
                        format!(
                            "reads {} which the later rule {} adjusts",
                            later.feature, later.id
                        ),
                    ));
                }
            }
        }
        Ok(Self { rules })
    }

    /// Downgrade rules in application order.
    pub fn rules(&self) -> &[DowngradeRule] {
        &self.rules
    }

    /// Apply every rule once and return the corrected set.
    pub fn apply(&self, flags: FlagSet) -> FlagSet {
        self.apply_traced(flags, &mut Trace::new())
    }

    /// Like [`Validator::apply`], recording each downgrade in `trace`.
    pub fn apply_traced(&self, flags: FlagSet, trace: &mut Trace) -> FlagSet {
        apply_rules(self.rules.iter(), flags, trace)
    }

    /// Apply only the rules adjusting `feature`.
    ///
    /// Called once `feature` and everything declared before it are final.
    pub fn settle_traced(&self, feature: Feature, flags: FlagSet, trace: &mut Trace) -> FlagSet {
        apply_rules(
            self.rules.iter().filter(|rule| rule.feature == feature),
            flags,
            trace,
        )
    }
}

fn apply_rules<'a>(
    rules: impl Iterator<Item = &'a DowngradeRule>,
    mut flags: FlagSet,
    trace: &mut Trace,
) -> FlagSet {
    for rule in rules {
        let Some(adjusted) = rule.apply(&flags) else {
            continue;
        };
        let from = flags.get(rule.feature);
        let to = adjusted.get(rule.feature);
        info!(
            rule_id = %rule.id,
            feature = %rule.feature,
            from = from.as_int(),
            to = to.as_int(),
            "{}",
            rule.description
        );
        trace.record(Phase::CrossValidate, rule.feature, to, rule.id.as_str());
        flags = adjusted;
    }
    flags
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ppf_core::StandardLevel;
    use ppf_core::logging::capture_logs;
    use tracing::Level;

    fn quad(qp: bool) -> FlagSet {
        FlagSet::defaults(StandardLevel::Std2008)
            .with(Feature::QpAvailable, FlagValue::Switch(qp))
            .with(Feature::RealPrecision, FlagValue::Int(128))
    }

    #[test]
    fn caps_precision_without_quad() {
        let flags = Validator::builtin().apply(quad(false));
        assert_eq!(flags.get(Feature::RealPrecision), FlagValue::Int(64));
    }

    #[test]
    fn keeps_precision_with_quad() {
        let input = quad(true);
        assert_eq!(Validator::builtin().apply(input), input);
    }

    #[test]
    fn lower_precisions_untouched() {
        let input = FlagSet::defaults(StandardLevel::Std2003)
            .with(Feature::RealPrecision, FlagValue::Int(32));
        assert_eq!(Validator::builtin().apply(input), input);
    }

    #[test]
    fn second_pass_is_identity() {
        let validator = Validator::builtin();
        let once = validator.apply(quad(false));
        assert_eq!(validator.apply(once), once);
    }

    #[test]
    fn downgrade_is_traced_and_logged() {
        let (logs, _guard) = capture_logs();
        let mut trace = Trace::new();
        let _ = Validator::builtin().apply_traced(quad(false), &mut trace);

        let entry = &trace.entries()[0];
        assert_eq!(entry.phase, Phase::CrossValidate);
        assert_eq!(entry.source, "quad-precision-unavailable");
        assert_eq!(entry.value, FlagValue::Int(64));

        let events = logs.matching("quadruple precision");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::INFO);
        assert_eq!(events[0].field("from"), Some("128"));
        assert_eq!(events[0].field("to"), Some("64"));
    }

    #[test]
    fn no_log_when_nothing_changes() {
        let (logs, _guard) = capture_logs();
        let _ = Validator::builtin().apply(quad(true));
        assert_eq!(logs.count_at_level(Level::INFO), 0);
    }

    fn rule(id: &str, feature: Feature, when: Vec<Condition>, adjustment: Adjustment) -> DowngradeRule {
        DowngradeRule {
            id: id.into(),
            description: id.into(),
            feature,
            when,
            adjustment,
        }
    }

    #[test]
    fn rejects_read_of_later_adjusted_feature() {
        let rules = vec![
            rule(
                "a",
                Feature::UseIeeeArithmetic,
                vec![Condition::AtLeast(Feature::RealPrecision, 128)],
                Adjustment::Set(FlagValue::Switch(false)),
            ),
            rule(
                "b",
                Feature::RealPrecision,
                vec![],
                Adjustment::CapAt(64),
            ),
        ];
        let err = Validator::new(rules).unwrap_err();
        assert!(err.to_string().contains("later rule b"));
    }

    #[test]
    fn accepts_read_of_earlier_adjusted_feature() {
        let rules = vec![
            rule(
                "b",
                Feature::RealPrecision,
                vec![Condition::Equals(Feature::QpAvailable, FlagValue::Switch(false))],
                Adjustment::CapAt(64),
            ),
            rule(
                "a",
                Feature::UseIeeeArithmetic,
                vec![Condition::AtLeast(Feature::RealPrecision, 128)],
                Adjustment::Set(FlagValue::Switch(false)),
            ),
        ];
        let validator = Validator::new(rules).unwrap();
        let input = quad(false).with(Feature::UseIeeeArithmetic, FlagValue::Switch(true));
        let out = validator.apply(input);
        // Precision was capped first, so the IEEE rule no longer fires.
        assert!(out.is_enabled(Feature::UseIeeeArithmetic));
        assert_eq!(validator.apply(out), out);
    }

    #[test]
    fn rejects_read_of_feature_resolved_later() {
        let rules = vec![rule(
            "late",
            Feature::RealPrecision,
            vec![Condition::Equals(Feature::UseStorageSize, FlagValue::Switch(true))],
            Adjustment::CapAt(32),
        )];
        let err = Validator::new(rules).unwrap_err();
        assert!(err.to_string().contains("resolved after real_precision"));
    }

    #[test]
    fn settle_touches_only_the_named_feature() {
        let validator = Validator::builtin();
        let mut trace = Trace::new();
        let input = quad(false);
        let untouched = validator.settle_traced(Feature::UseIeeeArithmetic, input, &mut trace);
        assert_eq!(untouched, input);
        assert!(trace.is_empty());

        let settled = validator.settle_traced(Feature::RealPrecision, input, &mut trace);
        assert_eq!(settled.get(Feature::RealPrecision), FlagValue::Int(64));
        assert_eq!(trace.len(), 1);
        assert_eq!(validator.apply(settled), settled);
    }

    #[test]
    fn rejects_out_of_domain_adjustments() {
        let cap = rule("cap", Feature::RealPrecision, vec![], Adjustment::CapAt(80));
        assert_matches!(Validator::new(vec![cap]), Err(EngineError::InvalidRule { .. }));

        let switch_cap = rule("s", Feature::Debugging, vec![], Adjustment::CapAt(0));
        assert_matches!(Validator::new(vec![switch_cap]), Err(EngineError::InvalidRule { .. }));

        let derived = rule(
            "d",
            Feature::FortranStandard,
            vec![],
            Adjustment::Set(FlagValue::Int(2003)),
        );
        assert_matches!(Validator::new(vec![derived]), Err(EngineError::InvalidRule { .. }));
    }

    #[test]
    fn builtin_passes_its_own_checks() {
        let builtin = Validator::builtin();
        assert_eq!(Validator::new(builtin.rules().to_vec()).unwrap(), builtin);
    }
}
