//! crates/simlog/src/level.rs
//! Log level enumeration and its mapping onto the report verbosity scale.

use std::fmt;
use std::str::FromStr;

use crate::error::{InvalidLogLevel, ParseLogLevelError};
use crate::verbosity::Verbosity;

/// Textual names of every [`LogLevel`], indexed by discriminant.
pub const LEVEL_NAMES: [&str; 8] = [
    "NONE", "FATAL", "ERROR", "WARNING", "INFO", "DEBUG", "TRACE", "TRACEALL",
];

const LEVELS: [LogLevel; 8] = [
    LogLevel::None,
    LogLevel::Fatal,
    LogLevel::Error,
    LogLevel::Warning,
    LogLevel::Info,
    LogLevel::Debug,
    LogLevel::Trace,
    LogLevel::TraceAll,
];

/// Ordered logging level.
///
/// Levels compare by declaration order, so `LogLevel::Warning < LogLevel::Info`
/// holds and "more verbose" means "greater".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[repr(u8)]
pub enum LogLevel {
    /// Nothing is reported.
    None = 0,
    /// Only fatal records.
    Fatal = 1,
    /// Errors and above.
    Error = 2,
    /// Warnings and above.
    #[default]
    Warning = 3,
    /// Informational records.
    Info = 4,
    /// Debug records.
    Debug = 5,
    /// Trace records.
    Trace = 6,
    /// Everything, including the finest trace output.
    TraceAll = 7,
}

impl LogLevel {
    /// Alias kept for configurations written against the older `DBGTRACE` name.
    pub const DBG_TRACE: Self = Self::TraceAll;

    /// Every level in declaration order.
    pub const ALL: [Self; 8] = LEVELS;

    /// Converts an integer into a level.
    ///
    /// # Panics
    ///
    /// Panics when `value` is greater than 7. An out of range level is a
    /// programming error, not a runtime condition.
    #[must_use]
    pub fn from_int(value: u8) -> Self {
        assert!(
            usize::from(value) < LEVELS.len(),
            "log level {value} is outside the range 0..=7"
        );
        LEVELS[usize::from(value)]
    }

    /// Returns the numeric discriminant of the level.
    #[must_use]
    pub const fn as_int(self) -> u8 {
        self as u8
    }

    /// Returns the fixed textual name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        LEVEL_NAMES[self as usize]
    }

    /// Looks up a level by its exact, case-sensitive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        LEVEL_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| LEVELS[index])
    }

    /// Parses the first whitespace-delimited token of `text` into `dest`.
    ///
    /// Unknown names leave `dest` untouched and return `false`. Configuration
    /// readers rely on this: they pre-load `dest` with a default and feed
    /// whatever the user wrote, so an unparsable value silently keeps the
    /// default.
    ///
    /// ```
    /// use simlog::LogLevel;
    ///
    /// let mut level = LogLevel::Warning;
    /// assert!(LogLevel::read_into("  DEBUG trailing", &mut level));
    /// assert_eq!(level, LogLevel::Debug);
    ///
    /// assert!(!LogLevel::read_into("debug", &mut level));
    /// assert_eq!(level, LogLevel::Debug);
    /// ```
    pub fn read_into(text: &str, dest: &mut Self) -> bool {
        let Some(token) = text.split_whitespace().next() else {
            return false;
        };
        match Self::from_name(token) {
            Some(level) => {
                *dest = level;
                true
            }
            None => false,
        }
    }

    /// Returns the report verbosity threshold associated with this level.
    ///
    /// Warning, error and fatal share [`Verbosity::LOW`]: below info the
    /// verbosity scale no longer discriminates and severity takes over.
    #[must_use]
    pub const fn verbosity(self) -> Verbosity {
        match self {
            Self::None => Verbosity::NONE,
            Self::Fatal | Self::Error | Self::Warning => Verbosity::LOW,
            Self::Info => Verbosity::MEDIUM,
            Self::Debug => Verbosity::HIGH,
            Self::Trace => Verbosity::FULL,
            Self::TraceAll => Verbosity::DEBUG,
        }
    }

    /// Returns the most verbose level whose threshold does not exceed `verbosity`.
    #[must_use]
    pub const fn from_verbosity(verbosity: Verbosity) -> Self {
        match verbosity.get() {
            0 => Self::None,
            v if v >= Verbosity::DEBUG.get() => Self::TraceAll,
            v if v >= Verbosity::FULL.get() => Self::Trace,
            v if v >= Verbosity::HIGH.get() => Self::Debug,
            v if v >= Verbosity::MEDIUM.get() => Self::Info,
            _ => Self::Warning,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::from_name(trimmed).ok_or_else(|| ParseLogLevelError::new(trimmed))
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = InvalidLogLevel;

    fn try_from(value: u8) -> Result<Self, InvalidLogLevel> {
        LEVELS
            .get(usize::from(value))
            .copied()
            .ok_or(InvalidLogLevel(value))
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.as_int()
    }
}
