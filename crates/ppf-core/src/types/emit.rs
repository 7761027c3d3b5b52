//! Output formats for the resolved flag set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Serialization format handed to the downstream build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitFormat {
    /// C-preprocessor header (`#define NAME VALUE`).
    #[default]
    Header,
    /// Compiler arguments (`-DNAME=VALUE`).
    Defines,
    /// JSON object in declaration order.
    Json,
}

impl EmitFormat {
    /// Parse a format name (case-insensitive).
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "header" | "h" => Some(EmitFormat::Header),
            "defines" | "args" => Some(EmitFormat::Defines),
            "json" => Some(EmitFormat::Json),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            EmitFormat::Header => "header",
            EmitFormat::Defines => "defines",
            EmitFormat::Json => "json",
        }
    }
}

impl fmt::Display for EmitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
