//! Shared vocabulary types.
//!
//! - [`identity`]: vendor, version, compiler identity, standard level
//! - [`feature`]: the feature catalog (names, domains, defaults, floors)
//! - [`flags`]: flag values and the complete [`FlagSet`]
//! - [`overrides`]: validated user overrides
//! - [`request`]: the input triple of a resolution call
//! - [`emit`]: output formats

pub mod emit;
pub mod feature;
pub mod flags;
pub mod identity;
pub mod overrides;
pub mod request;

pub use emit::EmitFormat;
pub use feature::{
    Feature, FeatureKind, INTEGER_KINDS, MAX_PORTABLE_PRECISION, REAL_PRECISIONS,
};
pub use flags::{FlagSet, FlagValue};
pub use identity::{CompilerIdentity, StandardLevel, Vendor, Version};
pub use overrides::Overrides;
pub use request::ResolutionRequest;
