//! crates/simlog/src/scoped.rs
//! Scope-bound logger that emits exactly one record when dropped.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use crate::dispatch;
use crate::record::{DEFAULT_CATEGORY, Record, ReportSink};
use crate::registry::VerbosityRegistry;
use crate::severity::SeverityTier;
use crate::verbosity::Verbosity;

/// Collects the text of one report and emits it when dropped.
///
/// The severity is the type parameter `S`, one of the markers in
/// [`tier`](crate::tier). Construction opens the message; appending
/// accumulates text in call order; dropping the logger closes it and hands a
/// single [`Record`] to the sink. The drop also runs while unwinding, so a
/// panic between construction and the end of scope still produces the
/// record.
///
/// The logger is deliberately not `Clone`: each value stands for exactly one
/// in-flight message.
///
/// Filtering is the caller's job. Use [`enabled`] (or the `sim_*!` macros,
/// which do so) before constructing an info-tier logger.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use simlog::{MemorySink, ScopedLogger, Verbosity, tier};
///
/// let sink = MemorySink::new();
/// {
///     let mut logger = ScopedLogger::<tier::Warning>::with_sink(&sink, file!(), line!(), Verbosity::MEDIUM);
///     logger.category("top.dma").append("burst of ").append(16).append(" beats");
/// }
/// let records = sink.records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].message, "burst of 16 beats");
/// assert_eq!(records[0].category, "top.dma");
/// ```
#[must_use = "the record is emitted when the logger is dropped"]
pub struct ScopedLogger<'a, S: SeverityTier> {
    message: String,
    category: Option<Cow<'a, str>>,
    file: &'static str,
    line: u32,
    verbosity: Verbosity,
    sink: Option<&'a dyn ReportSink>,
    severity: PhantomData<S>,
}

impl<'a, S: SeverityTier> ScopedLogger<'a, S> {
    /// Opens a logger whose record goes to the sink currently in effect.
    pub fn new(file: &'static str, line: u32, verbosity: Verbosity) -> Self {
        Self {
            message: String::new(),
            category: None,
            file,
            line,
            verbosity,
            sink: None,
            severity: PhantomData,
        }
    }

    /// Opens a logger whose record goes to `sink`.
    pub fn with_sink(
        sink: &'a dyn ReportSink,
        file: &'static str,
        line: u32,
        verbosity: Verbosity,
    ) -> Self {
        let mut logger = Self::new(file, line, verbosity);
        logger.sink = Some(sink);
        logger
    }

    /// Tags the record with `name`. The last call wins.
    pub fn category(&mut self, name: impl Into<Cow<'a, str>>) -> &mut Self {
        self.category = Some(name.into());
        self
    }

    /// Clears the category so the record uses [`DEFAULT_CATEGORY`].
    pub fn default_category(&mut self) -> &mut Self {
        self.category = None;
        self
    }

    /// Sets or clears the category.
    pub fn set_category(&mut self, name: Option<&'a str>) -> &mut Self {
        self.category = name.map(Cow::Borrowed);
        self
    }

    /// Appends the display form of `value` to the message.
    pub fn append(&mut self, value: impl fmt::Display) -> &mut Self {
        // Writing into a String cannot fail.
        let _ = fmt::Write::write_fmt(&mut self.message, format_args!("{value}"));
        self
    }

    /// Returns the text accumulated so far.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the category the record will carry.
    #[must_use]
    pub fn current_category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    /// Returns the verbosity the record will carry.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

impl<S: SeverityTier> fmt::Write for ScopedLogger<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.message.push_str(s);
        Ok(())
    }
}

impl<S: SeverityTier> fmt::Debug for ScopedLogger<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedLogger")
            .field("severity", &S::SEVERITY)
            .field("category", &self.current_category())
            .field("message", &self.message)
            .field("verbosity", &self.verbosity)
            .field("file", &self.file)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

impl<S: SeverityTier> Drop for ScopedLogger<'_, S> {
    fn drop(&mut self) {
        let record = Record {
            severity: S::SEVERITY,
            category: self.category.as_deref().unwrap_or(DEFAULT_CATEGORY),
            message: &self.message,
            verbosity: self.verbosity,
            file: self.file,
            line: self.line,
        };
        match self.sink {
            Some(sink) => sink.report(&record),
            None => dispatch::dispatch(&record),
        }
    }
}

/// Reports whether a call site of tier `S` at `verbosity` should construct a
/// logger, using the process-wide registry.
///
/// Only the info tier is filtered; every other tier is always enabled.
pub fn enabled<S: SeverityTier>(category: Option<&str>, verbosity: Verbosity) -> bool {
    enabled_in::<S>(VerbosityRegistry::global(), category, verbosity)
}

/// Same as [`enabled`] against an explicit registry.
pub fn enabled_in<S: SeverityTier>(
    registry: &VerbosityRegistry,
    category: Option<&str>,
    verbosity: Verbosity,
) -> bool {
    !S::FILTERED || registry.verbosity_for(category) >= verbosity
}
