//! # ppf-core
//!
//! Foundation types, fact collection, and errors for compiler capability
//! flag resolution.
//!
//! - **Identity**: [`Vendor`], [`Version`], [`CompilerIdentity`], [`StandardLevel`]
//! - **Features**: the [`Feature`] catalog with domains, defaults, and standard floors
//! - **Flags**: [`FlagValue`] and the always-complete [`FlagSet`]
//! - **Inputs**: [`RawToolchain`] → [`FactCollector`] → [`Facts`], plus [`Overrides`]
//! - **Errors**: [`ResolveError`] via `thiserror`
//! - **Logging**: `tracing` subscriber bootstrap and test capture

#![deny(unsafe_code)]

pub mod errors;
pub mod facts;
pub mod logging;
pub mod types;

pub use errors::{ResolveError, Result};
pub use facts::{FactCollector, Facts, RawToolchain};
pub use types::*;
