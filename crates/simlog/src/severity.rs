//! crates/simlog/src/severity.rs
//! Report severities and the type-level tiers used by [`ScopedLogger`](crate::ScopedLogger).

use std::fmt;

use crate::level::LogLevel;

/// Coarse severity of a report record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Informational output, further filtered by verbosity.
    Info,
    /// Recoverable anomaly.
    Warning,
    /// Failure that does not stop the run.
    Error,
    /// Failure after which the sink is expected to stop the process.
    Fatal,
}

impl Severity {
    /// Returns the upper-case label used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Parses the label produced by [`as_str`](Self::as_str).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "INFO" => Some(Self::Info),
            "WARNING" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "FATAL" => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Returns the least verbose global level at which records of this
    /// severity are still admitted.
    #[must_use]
    pub const fn minimum_level(self) -> LogLevel {
        match self {
            Self::Info => LogLevel::Info,
            Self::Warning => LogLevel::Warning,
            Self::Error => LogLevel::Error,
            Self::Fatal => LogLevel::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Severity fixed at the type level.
///
/// Implemented only by the markers in [`tier`]. `FILTERED` is `true` for the
/// info tier alone: warnings, errors and fatals are always constructed and
/// left to the sink.
pub trait SeverityTier: sealed::Sealed {
    /// Severity reported for records of this tier.
    const SEVERITY: Severity;
    /// Whether call sites consult verbosity before constructing a logger.
    const FILTERED: bool;
}

/// Zero-sized severity markers for [`ScopedLogger`](crate::ScopedLogger).
pub mod tier {
    use super::{Severity, SeverityTier, sealed::Sealed};

    /// Info tier marker.
    #[derive(Debug)]
    pub enum Info {}
    /// Warning tier marker.
    #[derive(Debug)]
    pub enum Warning {}
    /// Error tier marker.
    #[derive(Debug)]
    pub enum Error {}
    /// Fatal tier marker.
    #[derive(Debug)]
    pub enum Fatal {}

    impl Sealed for Info {}
    impl Sealed for Warning {}
    impl Sealed for Error {}
    impl Sealed for Fatal {}

    impl SeverityTier for Info {
        const SEVERITY: Severity = Severity::Info;
        const FILTERED: bool = true;
    }

    impl SeverityTier for Warning {
        const SEVERITY: Severity = Severity::Warning;
        const FILTERED: bool = false;
    }

    impl SeverityTier for Error {
        const SEVERITY: Severity = Severity::Error;
        const FILTERED: bool = false;
    }

    impl SeverityTier for Fatal {
        const SEVERITY: Severity = Severity::Fatal;
        const FILTERED: bool = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for severity in [
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Fatal,
        ] {
            assert_eq!(Severity::from_label(severity.as_str()), Some(severity));
        }
        assert_eq!(Severity::from_label("info"), None);
    }

    #[test]
    fn only_info_tier_is_filtered() {
        assert!(<tier::Info as SeverityTier>::FILTERED);
        assert!(!<tier::Warning as SeverityTier>::FILTERED);
        assert!(!<tier::Error as SeverityTier>::FILTERED);
        assert!(!<tier::Fatal as SeverityTier>::FILTERED);
    }

    #[test]
    fn minimum_levels_follow_severity() {
        assert_eq!(Severity::Fatal.minimum_level(), LogLevel::Fatal);
        assert_eq!(Severity::Warning.minimum_level(), LogLevel::Warning);
        assert!(Severity::Error.minimum_level() < Severity::Warning.minimum_level());
    }
}
