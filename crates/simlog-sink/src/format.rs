//! crates/simlog-sink/src/format.rs
//! Line rendering for simlog records.
//!
//! A rendered line has the shape
//!
//! ```text
//! [wall time] [sim time (delta)] SEVERITY: category                : message
//! ```
//!
//! where every bracketed prefix, the severity and the category column are
//! optional. The category is left-aligned and padded to the configured
//! width; longer categories are printed in full.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use anstyle::{AnsiColor, Color, Style};
use simlog::{LogLevel, Record, VerbosityRegistry};
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;

use crate::clock::{SimClock, render_time};
use crate::config::LogConfig;

const WALL_CLOCK_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour]:[minute]:[second].[subsecond digits:3]");

/// Renders records as single text lines.
#[derive(Clone)]
pub struct RecordFormatter {
    category_width: usize,
    print_sys_time: bool,
    print_sim_time: bool,
    print_delta: bool,
    print_severity: bool,
    colored: bool,
    clock: Option<Arc<dyn SimClock>>,
    registry: Option<Arc<VerbosityRegistry>>,
}

impl Default for RecordFormatter {
    fn default() -> Self {
        Self::from_config(&LogConfig::default())
    }
}

impl fmt::Debug for RecordFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFormatter")
            .field("category_width", &self.category_width)
            .field("print_sys_time", &self.print_sys_time)
            .field("print_sim_time", &self.print_sim_time)
            .field("print_delta", &self.print_delta)
            .field("print_severity", &self.print_severity)
            .field("colored", &self.colored)
            .field("clock", &self.clock.is_some())
            .finish_non_exhaustive()
    }
}

impl RecordFormatter {
    /// Creates a formatter with the layout options of `config`.
    ///
    /// Simulated time is only rendered once a clock is attached.
    #[must_use]
    pub fn from_config(config: &LogConfig) -> Self {
        Self {
            category_width: config.category_width,
            print_sys_time: config.print_sys_time,
            print_sim_time: config.print_sim_time,
            print_delta: config.print_delta,
            print_severity: config.print_severity,
            colored: config.colored_output,
            clock: None,
            registry: None,
        }
    }

    /// Creates an uncoloured formatter showing only severity, category and message.
    #[must_use]
    pub fn plain() -> Self {
        Self::from_config(
            &LogConfig::default()
                .with_sim_time(false)
                .with_colored_output(false),
        )
    }

    /// Attaches the simulated time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn SimClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Reads the cycle base from `registry` instead of the process-wide one.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<VerbosityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Enables or disables ANSI colour.
    #[must_use]
    pub const fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Reports whether the formatter emits ANSI colour.
    #[must_use]
    pub const fn is_colored(&self) -> bool {
        self.colored
    }

    /// Renders `record` into a new string without a trailing newline.
    #[must_use]
    pub fn format(&self, record: &Record<'_>) -> String {
        let mut line = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_record(&mut line, record, self.colored);
        line
    }

    /// Renders `record` into `out`, colouring it when `colored` is set.
    pub fn write_record<W: fmt::Write>(
        &self,
        out: &mut W,
        record: &Record<'_>,
        colored: bool,
    ) -> fmt::Result {
        if self.print_sys_time {
            let now = OffsetDateTime::from(SystemTime::now());
            match now.format(WALL_CLOCK_FORMAT) {
                Ok(text) => write!(out, "[{text}] ")?,
                Err(_) => out.write_str("[--:--:--.---] ")?,
            }
        }

        if self.print_sim_time
            && let Some(clock) = &self.clock
        {
            let registry = match self.registry.as_deref() {
                Some(registry) => registry,
                None => VerbosityRegistry::global(),
            };
            let time = render_time(clock.now(), registry.time_display());
            if self.print_delta {
                write!(out, "[{time} ({})] ", clock.delta_count())?;
            } else {
                write!(out, "[{time}] ")?;
            }
        }

        if self.print_severity {
            let level = record.level();
            let style = if colored { level_style(level) } else { Style::new() };
            write!(
                out,
                "{}{}{}: ",
                style.render(),
                level.as_str(),
                style.render_reset()
            )?;
        }

        if self.category_width > 0 {
            write!(
                out,
                "{:<width$}: ",
                record.category,
                width = self.category_width
            )?;
        }

        out.write_str(record.message)
    }
}

/// Console style for a level's label.
#[must_use]
pub fn level_style(level: LogLevel) -> Style {
    let color = |c| Style::new().fg_color(Some(Color::Ansi(c)));
    match level {
        LogLevel::Fatal => color(AnsiColor::Red).bold(),
        LogLevel::Error => color(AnsiColor::Red),
        LogLevel::Warning => color(AnsiColor::Yellow),
        LogLevel::Info => color(AnsiColor::Green),
        LogLevel::Debug => color(AnsiColor::Cyan),
        LogLevel::Trace | LogLevel::TraceAll => Style::new().dimmed(),
        LogLevel::None => Style::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use simlog::{Severity, Verbosity};
    use std::time::Duration;

    fn record(severity: Severity, verbosity: Verbosity) -> Record<'static> {
        Record {
            severity,
            category: "top.cpu",
            message: "fetch stalled",
            verbosity,
            file: "cpu.rs",
            line: 12,
        }
    }

    #[test]
    fn plain_layout_pads_category() {
        let formatter = RecordFormatter::plain();
        let line = formatter.format(&record(Severity::Warning, Verbosity::MEDIUM));
        assert_eq!(
            line,
            "WARNING: top.cpu                 : fetch stalled"
        );
    }

    #[test]
    fn info_records_show_fine_level() {
        let formatter = RecordFormatter::plain();
        let line = formatter.format(&record(Severity::Info, Verbosity::HIGH));
        assert!(line.starts_with("DEBUG: "));
    }

    #[test]
    fn zero_width_hides_category_and_severity_can_be_hidden() {
        let config = LogConfig::default()
            .with_sim_time(false)
            .with_colored_output(false)
            .with_category_width(0)
            .with_severity(false);
        let line = RecordFormatter::from_config(&config)
            .format(&record(Severity::Error, Verbosity::MEDIUM));
        assert_eq!(line, "fetch stalled");
    }

    #[test]
    fn sim_time_and_delta_prefix() {
        let clock = Arc::new(ManualClock::new());
        clock.set(Duration::from_nanos(1_200));
        clock.next_delta();

        let config = LogConfig::default()
            .with_colored_output(false)
            .with_delta(true)
            .with_category_width(0);
        let formatter = RecordFormatter::from_config(&config)
            .with_clock(clock)
            .with_registry(Arc::new(VerbosityRegistry::new()));
        let line = formatter.format(&record(Severity::Error, Verbosity::MEDIUM));
        assert_eq!(line, "[1.200 us (1)] ERROR: fetch stalled");
    }

    #[test]
    fn clock_without_registry_reads_process_wide_cycle_base() {
        let clock = Arc::new(ManualClock::new());
        clock.set(Duration::from_micros(3));
        let config = LogConfig::default()
            .with_colored_output(false)
            .with_category_width(0);
        let line = RecordFormatter::from_config(&config)
            .with_clock(clock)
            .format(&record(Severity::Error, Verbosity::MEDIUM));
        assert_eq!(line, "[3.000 us] ERROR: fetch stalled");
    }

    #[test]
    fn cycle_base_switches_time_rendering() {
        let clock = Arc::new(ManualClock::new());
        clock.set(Duration::from_nanos(500));
        let registry = Arc::new(VerbosityRegistry::new());
        registry.set_cycle_base(Duration::from_nanos(10));

        let config = LogConfig::default()
            .with_colored_output(false)
            .with_category_width(0);
        let formatter = RecordFormatter::from_config(&config)
            .with_clock(clock)
            .with_registry(registry);
        let line = formatter.format(&record(Severity::Warning, Verbosity::MEDIUM));
        assert_eq!(line, "[50 cycles] WARNING: fetch stalled");
    }

    #[test]
    fn wall_clock_prefix_has_fixed_shape() {
        let config = LogConfig::default()
            .with_sys_time(true)
            .with_sim_time(false)
            .with_colored_output(false)
            .with_category_width(0);
        let line = RecordFormatter::from_config(&config)
            .format(&record(Severity::Warning, Verbosity::MEDIUM));
        let (prefix, rest) = line.split_at(15);
        assert!(prefix.starts_with('[') && prefix.ends_with("] "), "{line}");
        assert_eq!(rest, "WARNING: fetch stalled");
    }

    #[test]
    fn colored_severity_is_wrapped_in_escapes() {
        let formatter = RecordFormatter::plain().with_colored(true);
        let line = formatter.format(&record(Severity::Error, Verbosity::MEDIUM));
        assert!(line.starts_with("\u{1b}["));
        assert!(line.contains("ERROR"));
        assert!(line.contains("\u{1b}[0m"));
    }
}
