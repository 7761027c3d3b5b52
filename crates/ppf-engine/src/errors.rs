//! Error types for the resolution engine.

use ppf_core::ResolveError;
use thiserror::Error;

/// Errors that can occur while building rule tables or running the pipeline.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Resolution failed (incompatible override, bad input token, …).
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A rule or downgrade rule is malformed.
    #[error("invalid rule {rule_id}: {message}")]
    InvalidRule {
        /// The ID of the offending rule.
        rule_id: String,
        /// Description of the problem.
        message: String,
    },

    /// JSON emission failed.
    #[error("failed to serialize flags: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid_rule(rule_id: &str, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule_id: rule_id.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ppf_core::Feature;

    #[test]
    fn invalid_rule_display() {
        let err = EngineError::invalid_rule("gnu.bad", "value outside domain");
        assert_eq!(err.to_string(), "invalid rule gnu.bad: value outside domain");
    }

    #[test]
    fn resolve_error_is_transparent() {
        let inner = ResolveError::NotOverridable {
            feature: Feature::FortranStandard,
        };
        let expected = inner.to_string();
        let err: EngineError = inner.into();
        assert_eq!(err.to_string(), expected);
        assert!(matches!(err, EngineError::Resolve(_)));
    }
}
