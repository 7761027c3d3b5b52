//! # ppf-engine
//!
//! Rule-driven resolution of compiler capability flags.
//!
//! - [`RuleSet`]: ordered vendor/version rule table, last match wins
//! - [`Resolver`]: defaults, vendor rules, standard floors, checked overrides
//! - [`Validator`]: idempotent cross-feature downgrades
//! - [`Emitter`]: header, `-D` argument, and JSON output
//! - [`Pipeline`]: the phase state machine tying the stages together
//! - [`ResolutionCache`]: concurrent memoization keyed by request

#![deny(unsafe_code)]

pub mod cache;
pub mod core_rules;
pub mod emitter;
pub mod errors;
pub mod pipeline;
pub mod resolver;
pub mod rules;
pub mod trace;
pub mod validator;

pub use cache::ResolutionCache;
pub use emitter::Emitter;
pub use errors::{EngineError, Result};
pub use pipeline::Pipeline;
pub use resolver::Resolver;
pub use rules::{Condition, Rule, RuleSet};
pub use trace::{Phase, Resolution, Trace, TraceEntry};
pub use validator::{Adjustment, DowngradeRule, Validator};
