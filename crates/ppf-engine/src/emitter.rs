//! Serialization of the final flag set.
//!
//! All formats list flags in declaration order, once each, with switches as
//! `0`/`1`.

use std::fmt::Write as _;

use ppf_core::{EmitFormat, FlagSet};

use crate::errors::Result;

const HEADER_BANNER: &str = "/* Capability flags generated by ppf. Do not edit. */";

/// Renders a [`FlagSet`] for downstream consumers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Emitter;

impl Emitter {
    /// `(macro name, integer value)` pairs in declaration order.
    pub fn pairs(flags: &FlagSet) -> Vec<(&'static str, i64)> {
        flags
            .iter()
            .map(|(feature, value)| (feature.macro_name(), value.as_int()))
            .collect()
    }

    /// C preprocessor header. Each flag is undefined before being defined so
    /// that the header wins over command-line definitions.
    pub fn header(flags: &FlagSet) -> String {
        let mut out = String::from(HEADER_BANNER);
        out.push('\n');
        for (name, value) in Self::pairs(flags) {
            let _ = write!(
                out,
                "\n#if defined {name}\n#undef {name}\n#endif\n#define {name} {value}\n"
            );
        }
        out
    }

    /// One `-DNAME=VALUE` argument per flag, space separated.
    pub fn defines(flags: &FlagSet) -> String {
        Self::pairs(flags)
            .into_iter()
            .map(|(name, value)| format!("-D{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Pretty-printed JSON object.
    pub fn json(flags: &FlagSet) -> Result<String> {
        Ok(serde_json::to_string_pretty(flags)?)
    }

    /// Render in the given format.
    pub fn emit(flags: &FlagSet, format: EmitFormat) -> Result<String> {
        match format {
            EmitFormat::Header => Ok(Self::header(flags)),
            EmitFormat::Defines => Ok(Self::defines(flags)),
            EmitFormat::Json => Self::json(flags),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
