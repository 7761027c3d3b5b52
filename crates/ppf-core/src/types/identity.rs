//! Toolchain identity: vendor, version, and requested language standard.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Vendor
// ─────────────────────────────────────────────────────────────────────────────

/// Compiler vendor.
///
/// Unrecognized vendor tokens map to [`Vendor::Unknown`], which never matches
/// a vendor rule and therefore resolves to the conservative default profile.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// GNU `gfortran`.
    Gnu,
    /// Intel `ifort` / `ifx`.
    Intel,
    /// NAG `nagfor`.
    Nag,
    /// PGI / NVIDIA `pgfortran` / `nvfortran`.
    Pgi,
    /// IBM XL Fortran.
    #[serde(rename = "ibmxl")]
    IbmXl,
    /// Any vendor not listed above.
    #[default]
    Unknown,
}

impl Vendor {
    /// All named vendors (excludes [`Vendor::Unknown`]).
    pub const KNOWN: [Vendor; 5] = [
        Vendor::Gnu,
        Vendor::Intel,
        Vendor::Nag,
        Vendor::Pgi,
        Vendor::IbmXl,
    ];

    /// Canonical lowercase tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Gnu => "gnu",
            Vendor::Intel => "intel",
            Vendor::Nag => "nag",
            Vendor::Pgi => "pgi",
            Vendor::IbmXl => "ibmxl",
            Vendor::Unknown => "unknown",
        }
    }

    /// Map a raw vendor token to a vendor.
    ///
    /// Matching is case-insensitive and ignores surrounding underscores, so
    /// predefined-macro spellings like `__GFORTRAN__` are accepted too.
    pub fn parse(token: &str) -> Self {
        let normalized = token.trim().trim_matches('_').to_ascii_lowercase();
        match normalized.as_str() {
            "gnu" | "gfortran" | "gcc" => Vendor::Gnu,
            "intel" | "ifort" | "ifx" | "intel_compiler" => Vendor::Intel,
            "nag" | "nagfor" | "nag_compiler_release" => Vendor::Nag,
            "pgi" | "pgfortran" | "nvfortran" | "nvidia" => Vendor::Pgi,
            "ibm" | "xl" | "xlf" | "ibmxl" => Vendor::IbmXl,
            _ => Vendor::Unknown,
        }
    }

    /// True for every vendor except [`Vendor::Unknown`].
    pub fn is_known(self) -> bool {
        self != Vendor::Unknown
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Version
// ─────────────────────────────────────────────────────────────────────────────

/// Compiler version as `(major, minor)`.
///
/// Ordering is lexicographic: `4.6 < 5.0 < 5.3 < 17.1`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Version {
    /// Major version component.
    pub major: u32,
    /// Minor version component.
    pub minor: u32,
}

impl Version {
    /// The version assumed when the raw version cannot be parsed.
    pub const ZERO: Version = Version { major: 0, minor: 0 };

    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a raw version string for the given vendor.
    ///
    /// Accepts dotted `major.minor[.patch]` (extra components ignored) or a
    /// single integer in the vendor's native encoding:
    /// - Intel `NNNN` → `NNNN / 100`, `NNNN % 100 / 10` (`1710` → 17.1)
    /// - NAG two-digit release `RR` → `RR / 10`, `RR % 10` (`53` → 5.3)
    /// - anything else `N` → `N.0`
    ///
    /// Returns `None` for empty or non-numeric input.
    pub fn parse_for(vendor: Vendor, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut parts = raw.split('.');
        let first: u32 = parts.next()?.trim().parse().ok()?;
        match parts.next() {
            Some(minor) => {
                let minor: u32 = minor.trim().parse().ok()?;
                Some(Self::new(first, minor))
            }
            None => Some(Self::decode_packed(vendor, first)),
        }
    }

    fn decode_packed(vendor: Vendor, n: u32) -> Self {
        match vendor {
            Vendor::Intel if n >= 100 => Self::new(n / 100, n % 100 / 10),
            Vendor::Nag if (10..100).contains(&n) => Self::new(n / 10, n % 10),
            _ => Self::new(n, 0),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CompilerIdentity
// ─────────────────────────────────────────────────────────────────────────────

/// Vendor and version of the compiler in use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompilerIdentity {
    /// Compiler vendor.
    pub vendor: Vendor,
    /// Compiler version.
    pub version: Version,
}

impl CompilerIdentity {
    /// Create an identity.
    pub const fn new(vendor: Vendor, version: Version) -> Self {
        Self { vendor, version }
    }

    /// The identity of an unrecognized toolchain.
    pub const fn unknown() -> Self {
        Self::new(Vendor::Unknown, Version::ZERO)
    }
}

impl fmt::Display for CompilerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.vendor, self.version)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StandardLevel
// ─────────────────────────────────────────────────────────────────────────────

/// Requested Fortran language standard, totally ordered by year.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum StandardLevel {
    /// Fortran 95.
    #[serde(rename = "95")]
    Std95,
    /// Fortran 2003.
    #[default]
    #[serde(rename = "2003")]
    Std2003,
    /// Fortran 2008.
    #[serde(rename = "2008")]
    Std2008,
    /// Fortran 2018.
    #[serde(rename = "2018")]
    Std2018,
}

impl StandardLevel {
    /// All levels in ascending order.
    pub const ALL: [StandardLevel; 4] = [
        StandardLevel::Std95,
        StandardLevel::Std2003,
        StandardLevel::Std2008,
        StandardLevel::Std2018,
    ];

    /// The lowest level; features gated at this level are never floored.
    pub const LOWEST: StandardLevel = StandardLevel::Std95;

    /// Four-digit year of the standard (the emitted `__FORTRAN_STANDARD__`).
    pub fn year(self) -> i64 {
        match self {
            StandardLevel::Std95 => 1995,
            StandardLevel::Std2003 => 2003,
            StandardLevel::Std2008 => 2008,
            StandardLevel::Std2018 => 2018,
        }
    }

    /// Look up a level by its four-digit year.
    pub fn from_year(year: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.year() == year)
    }

    /// Parse a requested-standard token.
    ///
    /// Accepts `95`/`1995`, `2003`/`03`, `2008`/`08`, `2018`/`18`, optionally
    /// prefixed with `f` or `std` (case-insensitive). Returns `None` for an
    /// empty or unrecognized token.
    pub fn parse(token: &str) -> Option<Self> {
        let lowered = token.trim().to_ascii_lowercase();
        let digits = lowered
            .strip_prefix("std")
            .or_else(|| lowered.strip_prefix('f'))
            .unwrap_or(lowered.as_str());
        match digits {
            "95" | "1995" => Some(StandardLevel::Std95),
            "03" | "2003" => Some(StandardLevel::Std2003),
            "08" | "2008" => Some(StandardLevel::Std2008),
            "18" | "2018" => Some(StandardLevel::Std2018),
            _ => None,
        }
    }
}

impl fmt::Display for StandardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fortran {}", self.year())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
