//! Pipeline phases and the diagnostic trace of a resolution.

use std::fmt;

use ppf_core::{Feature, FlagSet, FlagValue, ResolutionRequest};
use serde::Serialize;

/// Pipeline phase. Phases run in declaration order, each exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Defaults assigned.
    Init,
    /// Vendor rules applied.
    VendorDetect,
    /// Standard floors enforced.
    StandardFloor,
    /// User overrides applied.
    Override,
    /// Downgrade rules applied.
    CrossValidate,
    /// Output produced. Terminal.
    Emit,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 6] = [
        Phase::Init,
        Phase::VendorDetect,
        Phase::StandardFloor,
        Phase::Override,
        Phase::CrossValidate,
        Phase::Emit,
    ];

    /// The phase that follows this one, or `None` for [`Phase::Emit`].
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Init => Some(Phase::VendorDetect),
            Phase::VendorDetect => Some(Phase::StandardFloor),
            Phase::StandardFloor => Some(Phase::Override),
            Phase::Override => Some(Phase::CrossValidate),
            Phase::CrossValidate => Some(Phase::Emit),
            Phase::Emit => None,
        }
    }

    /// Snake-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::VendorDetect => "vendor_detect",
            Phase::StandardFloor => "standard_floor",
            Phase::Override => "override",
            Phase::CrossValidate => "cross_validate",
            Phase::Emit => "emit",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value change (or confirmation) recorded during resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// Phase that produced the value.
    pub phase: Phase,
    /// Affected feature.
    pub feature: Feature,
    /// Value after this step.
    #[serde(serialize_with = "serialize_value")]
    pub value: FlagValue,
    /// What produced the value: `default`, a rule ID, `floor`, `override`.
    pub source: String,
}

fn serialize_value<S: serde::Serializer>(value: &FlagValue, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(value.as_int())
}

/// Ordered record of how each flag got its value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    /// Empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(
        &mut self,
        phase: Phase,
        feature: Feature,
        value: FlagValue,
        source: impl Into<String>,
    ) {
        self.entries.push(TraceEntry {
            phase,
            feature,
            value,
            source: source.into(),
        });
    }

    /// All entries in recording order.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Entries for one feature.
    pub fn for_feature(&self, feature: Feature) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(move |e| e.feature == feature)
    }

    /// Entries recorded in one phase.
    pub fn in_phase(&self, phase: Phase) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(move |e| e.phase == phase)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The outcome of one successful pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The input triple.
    #[serde(skip)]
    pub request: ResolutionRequest,
    /// Final, validated flags.
    pub flags: FlagSet,
    /// How each flag got its value.
    pub trace: Trace,
    /// Phases completed, in order.
    pub phases: Vec<Phase>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppf_core::StandardLevel;

    #[test]
    fn phases_advance_forward_to_emit() {
        let mut walked = vec![Phase::Init];
        let mut phase = Phase::Init;
        while let Some(next) = phase.next() {
            assert!(next > phase);
            walked.push(next);
            phase = next;
        }
        assert_eq!(walked, Phase::ALL);
        assert_eq!(phase, Phase::Emit);
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::CrossValidate.to_string(), "cross_validate");
    }

    #[test]
    fn trace_filters() {
        let mut trace = Trace::new();
        trace.record(
            Phase::Init,
            Feature::UseStorageSize,
            FlagValue::Switch(false),
            "default",
        );
        trace.record(
            Phase::VendorDetect,
            Feature::UseStorageSize,
            FlagValue::Switch(true),
            "gnu.storage-size",
        );
        trace.record(
            Phase::Init,
            Feature::FortranStandard,
            FlagValue::Int(StandardLevel::Std2008.year()),
            "default",
        );

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.for_feature(Feature::UseStorageSize).count(), 2);
        assert_eq!(trace.in_phase(Phase::Init).count(), 2);
        let last = trace.for_feature(Feature::UseStorageSize).last().unwrap();
        assert_eq!(last.source, "gnu.storage-size");
    }

    #[test]
    fn trace_serializes_values_as_integers() {
        let mut trace = Trace::new();
        trace.record(
            Phase::StandardFloor,
            Feature::UseIeeeArithmetic,
            FlagValue::Switch(false),
            "floor",
        );
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "phase": "standard_floor",
                "feature": "use_ieee_arithmetic",
                "value": 0,
                "source": "floor"
            }])
        );
    }
}
