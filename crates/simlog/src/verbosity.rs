//! crates/simlog/src/verbosity.rs
//! Numeric verbosity scale understood by the report sink.

use std::fmt;

/// Verbosity on the report sink's numeric scale.
///
/// Only info-tier records are filtered by verbosity. The named constants are
/// the documented thresholds; any other value is accepted and compares
/// numerically.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Verbosity(u32);

impl Verbosity {
    /// Suppresses every info record.
    pub const NONE: Self = Self(0);
    /// Threshold shared by warning, error and fatal levels.
    pub const LOW: Self = Self(100);
    /// Threshold for info output.
    pub const MEDIUM: Self = Self(200);
    /// Threshold for debug output.
    pub const HIGH: Self = Self(300);
    /// Threshold for trace output.
    pub const FULL: Self = Self(400);
    /// Threshold for trace-all output.
    pub const DEBUG: Self = Self(500);

    /// Wraps a raw verbosity value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for Verbosity {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Verbosity> for u32 {
    fn from(verbosity: Verbosity) -> Self {
        verbosity.0
    }
}
