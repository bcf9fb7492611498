//! Error types produced when converting text or integers into levels.

use thiserror::Error;

/// Error returned when strict parsing of a [`LogLevel`](crate::LogLevel) fails.
///
/// Only [`FromStr`](std::str::FromStr) produces this error. The lenient
/// [`LogLevel::read_into`](crate::LogLevel::read_into) reports a mismatch by
/// leaving its destination unchanged instead.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown log level '{input}', expected one of NONE, FATAL, ERROR, WARNING, INFO, DEBUG, TRACE, TRACEALL")]
pub struct ParseLogLevelError {
    input: String,
}

impl ParseLogLevelError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }

    /// Returns the text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Error returned by the checked integer conversion into a level.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("log level {0} is outside the range 0..=7")]
pub struct InvalidLogLevel(pub u8);
