//! End-to-end pipeline: facts → resolver → validator → emitter.
//!
//! Drives the phase state machine
//! `Init → VendorDetect → StandardFloor → Override → CrossValidate → Emit`.
//! Each phase runs exactly once and transitions only move forward. The three
//! middle phases happen feature by feature inside the [`Resolver`], so the
//! pipeline enters `VendorDetect` before resolving and marks the other two
//! complete once the resolver returns; the trace tags each individual step.
//! Downgrades are settled inside the resolver as well, and the closing
//! `CrossValidate` pass confirms the set is consistent.

use std::sync::Arc;

use ppf_core::{EmitFormat, FactCollector, Overrides, RawToolchain, ResolutionRequest};
use tracing::debug;

use crate::emitter::Emitter;
use crate::errors::Result;
use crate::resolver::Resolver;
use crate::rules::RuleSet;
use crate::trace::{Phase, Resolution, Trace};
use crate::validator::Validator;

/// Forward-only phase cursor.
struct PhaseTracker {
    current: Phase,
    completed: Vec<Phase>,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            current: Phase::Init,
            completed: vec![Phase::Init],
        }
    }

    fn advance(&mut self, to: Phase) {
        debug_assert_eq!(self.current.next(), Some(to), "phase skipped or repeated");
        debug!(from = %self.current, to = %to, "phase transition");
        self.current = to;
        self.completed.push(to);
    }
}

/// The configured resolution pipeline.
#[derive(Clone, Debug)]
pub struct Pipeline {
    rules: Arc<RuleSet>,
    validator: Validator,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Pipeline over the built-in rules and downgrades.
    pub fn new() -> Self {
        Self {
            rules: RuleSet::builtin(),
            validator: Validator::builtin(),
        }
    }

    /// Replace the vendor rule table.
    #[must_use]
    pub fn with_rules(mut self, rules: Arc<RuleSet>) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the downgrade rules.
    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// The vendor rule table in use.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Resolve and validate `request`, stopping before emission.
    pub fn resolve(&self, request: &ResolutionRequest) -> Result<Resolution> {
        let mut tracker = PhaseTracker::new();
        let mut trace = Trace::new();

        tracker.advance(Phase::VendorDetect);
        let resolved = Resolver::new(&self.rules)
            .with_validator(&self.validator)
            .resolve_traced(request, &mut trace)?;
        tracker.advance(Phase::StandardFloor);
        tracker.advance(Phase::Override);

        tracker.advance(Phase::CrossValidate);
        let flags = self.validator.apply_traced(resolved, &mut trace);

        Ok(Resolution {
            request: request.clone(),
            flags,
            trace,
            phases: tracker.completed,
        })
    }

    /// Emit a finished resolution.
    pub fn emit(&self, resolution: &Resolution, format: EmitFormat) -> Result<String> {
        debug!(from = %Phase::CrossValidate, to = %Phase::Emit, format = %format, "phase transition");
        Emitter::emit(&resolution.flags, format)
    }

    /// Collect facts from raw tokens, resolve, validate, and emit.
    pub fn run(
        &self,
        raw: &RawToolchain,
        overrides: Overrides,
        format: EmitFormat,
    ) -> Result<String> {
        let facts = FactCollector::collect(raw)?;
        let request = ResolutionRequest::from_facts(facts, overrides);
        let resolution = self.resolve(&request)?;
        self.emit(&resolution, format)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use crate::rules::Rule;
    use assert_matches::assert_matches;
    use ppf_core::logging::capture_logs;
    use ppf_core::{
        CompilerIdentity, Feature, FlagValue, ResolveError, StandardLevel, Vendor, Version,
    };

    fn gnu(standard: StandardLevel) -> ResolutionRequest {
        ResolutionRequest::new(
            CompilerIdentity::new(Vendor::Gnu, Version::new(6, 0)),
            standard,
            Overrides::new(),
        )
    }

    #[test]
    fn phases_complete_in_order() {
        let resolution = Pipeline::new().resolve(&gnu(StandardLevel::Std2008)).unwrap();
        assert_eq!(
            resolution.phases,
            vec![
                Phase::Init,
                Phase::VendorDetect,
                Phase::StandardFloor,
                Phase::Override,
                Phase::CrossValidate,
            ]
        );
    }

    #[test]
    fn transitions_are_logged() {
        let (logs, _guard) = capture_logs();
        let pipeline = Pipeline::new();
        let resolution = pipeline.resolve(&gnu(StandardLevel::Std2003)).unwrap();
        let _ = pipeline.emit(&resolution, EmitFormat::Defines).unwrap();

        let transitions = logs.matching("phase transition");
        let targets: Vec<&str> = transitions
            .iter()
            .filter_map(|e| e.field("to"))
            .collect();
        assert_eq!(
            targets,
            vec!["vendor_detect", "standard_floor", "override", "cross_validate", "emit"]
        );
    }

    #[test]
    fn quad_precision_is_downgraded_silently() {
        for standard in [StandardLevel::Std2003, StandardLevel::Std2008] {
            let mut request = gnu(standard);
            request.overrides = Overrides::new()
                .with(Feature::RealPrecision, FlagValue::Int(128))
                .unwrap();
            let resolution = Pipeline::new().resolve(&request).unwrap();
            assert_eq!(resolution.flags.get(Feature::RealPrecision), FlagValue::Int(64));
            // The GNU quad rule sees the capped precision, so IEEE stays on.
            assert!(resolution.flags.is_enabled(Feature::UseIeeeArithmetic));
            assert!(
                !resolution
                    .trace
                    .for_feature(Feature::UseIeeeArithmetic)
                    .any(|e| e.source == "gnu.ieee-arithmetic-no-quad")
            );
            let last = resolution
                .trace
                .for_feature(Feature::RealPrecision)
                .last()
                .unwrap();
            assert_eq!(last.phase, Phase::CrossValidate);
        }
    }

    #[test]
    fn downgrade_is_logged_once() {
        let (logs, _guard) = capture_logs();
        let mut request = gnu(StandardLevel::Std2008);
        request.overrides = Overrides::new()
            .with(Feature::RealPrecision, FlagValue::Int(128))
            .unwrap();
        let _ = Pipeline::new().resolve(&request).unwrap();
        assert_eq!(logs.matching("quadruple precision").len(), 1);
    }

    #[test]
    fn incompatible_override_aborts() {
        let mut request = gnu(StandardLevel::Std2003);
        request.overrides = Overrides::new()
            .with(Feature::UseStorageSize, FlagValue::Switch(true))
            .unwrap();
        assert_matches!(
            Pipeline::new().resolve(&request),
            Err(EngineError::Resolve(ResolveError::IncompatibleOverride { .. }))
        );
    }

    #[test]
    fn run_from_raw_tokens() {
        let raw = RawToolchain::new("__INTEL_COMPILER", "1710", "f2008");
        let out = Pipeline::new()
            .run(&raw, Overrides::new(), EmitFormat::Defines)
            .unwrap();
        assert!(out.contains("-D__USE_STORAGE_SIZE__=1"));
        assert!(out.contains("-D__FORTRAN_STANDARD__=2008"));
    }

    #[test]
    fn run_rejects_unknown_standard() {
        let raw = RawToolchain::new("gnu", "9.1", "f77");
        assert_matches!(
            Pipeline::new().run(&raw, Overrides::new(), EmitFormat::Header),
            Err(EngineError::Resolve(ResolveError::UnknownStandard { .. }))
        );
    }

    #[test]
    fn custom_rules_extend_builtin() {
        let rules = RuleSet::builtin()
            .extend([Rule::new(
                "nag.intrinsic-algebra",
                Vendor::Nag,
                Version::new(6, 0),
                Feature::UseIntrinsicAlgebra,
                FlagValue::Switch(true),
            )])
            .unwrap();
        let pipeline = Pipeline::new().with_rules(Arc::new(rules));
        let request = ResolutionRequest::new(
            CompilerIdentity::new(Vendor::Nag, Version::new(7, 1)),
            StandardLevel::Std2008,
            Overrides::new(),
        );
        let flags = pipeline.resolve(&request).unwrap().flags;
        assert!(flags.is_enabled(Feature::UseIntrinsicAlgebra));
        assert!(flags.is_enabled(Feature::UseStorageSize));
    }
}
