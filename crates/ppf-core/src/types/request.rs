//! Resolution request: the input triple of one resolution call.

use crate::facts::Facts;
use crate::types::identity::{CompilerIdentity, StandardLevel};
use crate::types::overrides::Overrides;

/// Identity, requested standard, and overrides for one resolution.
///
/// Resolution is a pure function of this value, so it doubles as a cache key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResolutionRequest {
    /// Compiler in use.
    pub identity: CompilerIdentity,
    /// Requested language standard.
    pub standard: StandardLevel,
    /// Explicit user overrides.
    pub overrides: Overrides,
}

impl ResolutionRequest {
    /// Create a request.
    pub fn new(identity: CompilerIdentity, standard: StandardLevel, overrides: Overrides) -> Self {
        Self {
            identity,
            standard,
            overrides,
        }
    }

    /// Create a request from collected facts.
    pub fn from_facts(facts: Facts, overrides: Overrides) -> Self {
        Self::new(facts.identity, facts.standard, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::identity::{Vendor, Version};

    #[test]
    fn from_facts_copies_identity_and_standard() {
        let facts = Facts {
            identity: CompilerIdentity::new(Vendor::Gnu, Version::new(6, 0)),
            standard: StandardLevel::Std2008,
        };
        let request = ResolutionRequest::from_facts(facts, Overrides::new());
        assert_eq!(request.identity.vendor, Vendor::Gnu);
        assert_eq!(request.standard, StandardLevel::Std2008);
        assert!(request.overrides.is_empty());
    }

    #[test]
    fn default_request_is_unknown_at_2003() {
        let request = ResolutionRequest::default();
        assert_eq!(request.identity, CompilerIdentity::unknown());
        assert_eq!(request.standard, StandardLevel::Std2003);
    }
}
