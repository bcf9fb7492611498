//! crates/simlog-sink/src/config.rs
//! Logging setup consumed once by the initialisation entry points.

use std::path::{Path, PathBuf};

use simlog::LogLevel;

/// Default width of the category column.
pub const DEFAULT_CATEGORY_WIDTH: usize = 24;

/// Configuration for [`init_logging_with`](crate::init_logging_with).
///
/// Fields are public; the `with_*` methods allow building a configuration
/// in one expression.
///
/// ```
/// use simlog::LogLevel;
/// use simlog_sink::LogConfig;
///
/// let config = LogConfig::default()
///     .with_level(LogLevel::Debug)
///     .with_category_width(16)
///     .with_colored_output(false);
/// assert_eq!(config.level, LogLevel::Debug);
/// assert!(config.print_sim_time);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LogConfig {
    /// Global level installed in the process-wide registry.
    pub level: LogLevel,
    /// Width the category column is padded to; 0 hides the category.
    pub category_width: usize,
    /// Prefix each line with the wall-clock time.
    pub print_sys_time: bool,
    /// Prefix each line with the simulated time or cycle count.
    pub print_sim_time: bool,
    /// Append the delta-cycle count to the simulated time.
    pub print_delta: bool,
    /// Show the severity label.
    pub print_severity: bool,
    /// Colour console output.
    pub colored_output: bool,
    /// Additionally write plain-text output to this file.
    pub log_file: Option<PathBuf>,
    /// Keep only categories matching this regular expression.
    pub category_filter: Option<String>,
    /// Write the log file from a background worker.
    pub log_async: bool,
    /// Skip creating a configuration broker. Accepted for compatibility with
    /// simulation frontends; there is no broker to create here.
    pub dont_create_broker: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warning,
            category_width: DEFAULT_CATEGORY_WIDTH,
            print_sys_time: false,
            print_sim_time: true,
            print_delta: false,
            print_severity: true,
            colored_output: true,
            log_file: None,
            category_filter: None,
            log_async: true,
            dont_create_broker: false,
        }
    }
}

impl LogConfig {
    /// Sets the global level.
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the category column width.
    pub const fn with_category_width(mut self, width: usize) -> Self {
        self.category_width = width;
        self
    }

    /// Enables or disables the wall-clock prefix.
    pub const fn with_sys_time(mut self, enabled: bool) -> Self {
        self.print_sys_time = enabled;
        self
    }

    /// Enables or disables the simulated time prefix.
    pub const fn with_sim_time(mut self, enabled: bool) -> Self {
        self.print_sim_time = enabled;
        self
    }

    /// Enables or disables the delta-cycle suffix.
    pub const fn with_delta(mut self, enabled: bool) -> Self {
        self.print_delta = enabled;
        self
    }

    /// Enables or disables the severity label.
    pub const fn with_severity(mut self, enabled: bool) -> Self {
        self.print_severity = enabled;
        self
    }

    /// Enables or disables colour on the console.
    pub const fn with_colored_output(mut self, enabled: bool) -> Self {
        self.colored_output = enabled;
        self
    }

    /// Sets the log file. An empty path clears it.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.log_file = (!path.as_os_str().is_empty()).then_some(path);
        self
    }

    /// Sets the category filter. An empty pattern clears it.
    pub fn with_category_filter(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.category_filter = (!pattern.is_empty()).then_some(pattern);
        self
    }

    /// Enables or disables background writing of the log file.
    pub const fn with_log_async(mut self, enabled: bool) -> Self {
        self.log_async = enabled;
        self
    }

    /// Records the broker preference.
    pub const fn with_dont_create_broker(mut self, enabled: bool) -> Self {
        self.dont_create_broker = enabled;
        self
    }

    /// Returns the log file path, if any.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Builds the configuration behind the three-argument initialiser.
    pub fn from_basic(level: LogLevel, category_width: usize, print_sys_time: bool) -> Self {
        Self::default()
            .with_level(level)
            .with_category_width(category_width)
            .with_sys_time(print_sys_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Warning);
        assert_eq!(config.category_width, 24);
        assert!(!config.print_sys_time);
        assert!(config.print_sim_time);
        assert!(!config.print_delta);
        assert!(config.print_severity);
        assert!(config.colored_output);
        assert!(config.log_file.is_none());
        assert!(config.category_filter.is_none());
        assert!(config.log_async);
        assert!(!config.dont_create_broker);
    }

    #[test]
    fn empty_strings_clear_optional_fields() {
        let config = LogConfig::default()
            .with_log_file("run.log")
            .with_category_filter("^top\\.")
            .with_log_file("")
            .with_category_filter(String::new());
        assert_eq!(config.log_file(), None);
        assert_eq!(config.category_filter, None);
    }

    #[test]
    fn from_basic_keeps_other_defaults() {
        let config = LogConfig::from_basic(LogLevel::Trace, 0, true);
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.category_width, 0);
        assert!(config.print_sys_time);
        assert!(config.print_sim_time);
        assert!(config.log_async);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let config: LogConfig =
            serde_json::from_str(r#"{"level":"DEBUG","log_file":"sim.log"}"#).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.log_file(), Some(Path::new("sim.log")));
        assert_eq!(config.category_width, DEFAULT_CATEGORY_WIDTH);
    }
}
