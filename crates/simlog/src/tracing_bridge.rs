//! crates/simlog/src/tracing_bridge.rs
//! Bridge from simlog records to the tracing crate.
//!
//! Records become events on the [`REPORT_TARGET`] target. The simlog fields
//! travel as event fields so a subscriber-side formatter can rebuild the
//! record:
//!
//! | field       | content                               |
//! |-------------|---------------------------------------|
//! | `message`   | accumulated text                      |
//! | `category`  | record category                       |
//! | `severity`  | `INFO`, `WARNING`, `ERROR` or `FATAL` |
//! | `verbosity` | numeric verbosity                     |
//! | `file`      | emitting source file                  |
//! | `line`      | emitting source line                  |
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use simlog::{TracingSink, set_global_sink};
//!
//! set_global_sink(Arc::new(TracingSink::new()));
//! simlog::sim_warn!("routed through tracing");
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::Level;

use crate::record::{Record, ReportSink};
use crate::registry::VerbosityRegistry;
use crate::severity::Severity;
use crate::verbosity::Verbosity;

/// Target of every event produced from a record.
pub const REPORT_TARGET: &str = "simlog::report";

/// What a [`TracingSink`] does after forwarding a fatal record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FatalAction {
    /// Abort the process.
    #[default]
    Abort,
    /// Keep running; the record is only logged.
    Ignore,
}

type CategoryFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;
type FatalHook = Arc<dyn Fn() + Send + Sync>;

/// [`ReportSink`] that forwards admitted records to the tracing dispatcher.
#[derive(Clone, Default)]
pub struct TracingSink {
    registry: Option<Arc<VerbosityRegistry>>,
    category_filter: Option<CategoryFilter>,
    fatal_hook: Option<FatalHook>,
    fatal_action: FatalAction,
}

impl fmt::Debug for TracingSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingSink")
            .field("registry", &self.registry)
            .field("category_filter", &self.category_filter.is_some())
            .field("fatal_hook", &self.fatal_hook.is_some())
            .field("fatal_action", &self.fatal_action)
            .finish()
    }
}

impl TracingSink {
    /// Creates a sink that consults the process-wide registry and aborts on fatal records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `registry` instead of the process-wide one for suppression.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<VerbosityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Keeps only records whose category satisfies `filter`.
    #[must_use]
    pub fn with_category_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.category_filter = Some(Arc::new(filter));
        self
    }

    /// Selects the behaviour after a fatal record.
    #[must_use]
    pub const fn with_fatal_action(mut self, action: FatalAction) -> Self {
        self.fatal_action = action;
        self
    }

    /// Runs `hook` after every fatal record is forwarded and before the
    /// fatal action is taken.
    ///
    /// Backends with buffered writers flush them here, since an abort skips
    /// every destructor.
    #[must_use]
    pub fn with_fatal_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.fatal_hook = Some(Arc::new(hook));
        self
    }

    /// Returns the configured fatal action.
    #[must_use]
    pub const fn fatal_action(&self) -> FatalAction {
        self.fatal_action
    }

    fn registry(&self) -> &VerbosityRegistry {
        match self.registry.as_deref() {
            Some(registry) => registry,
            None => VerbosityRegistry::global(),
        }
    }

    fn accepts(&self, record: &Record<'_>) -> bool {
        let category_ok = self
            .category_filter
            .as_ref()
            .is_none_or(|filter| filter(record.category));
        category_ok && self.registry().admits(record)
    }
}

impl ReportSink for TracingSink {
    fn report(&self, record: &Record<'_>) {
        if self.accepts(record) {
            emit_event(record);
        }
        if record.severity != Severity::Fatal {
            return;
        }
        if let Some(hook) = &self.fatal_hook {
            hook();
        }
        if self.fatal_action == FatalAction::Abort {
            std::process::abort();
        }
    }
}

/// Maps a record onto the tracing level it is emitted at.
///
/// Info-tier records spread over `INFO`, `DEBUG` and `TRACE` by verbosity.
#[must_use]
pub const fn tracing_level(record: &Record<'_>) -> Level {
    match record.severity {
        Severity::Fatal | Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARN,
        Severity::Info => {
            let verbosity = record.verbosity.get();
            if verbosity <= Verbosity::MEDIUM.get() {
                Level::INFO
            } else if verbosity <= Verbosity::HIGH.get() {
                Level::DEBUG
            } else {
                Level::TRACE
            }
        }
    }
}

macro_rules! report_event {
    ($level:expr, $record:expr) => {
        tracing::event!(
            target: REPORT_TARGET,
            $level,
            category = $record.category,
            severity = $record.severity.as_str(),
            verbosity = $record.verbosity.get(),
            file = $record.file,
            line = $record.line,
            "{}",
            $record.message
        )
    };
}

/// Emits `record` as a tracing event without any suppression.
pub fn emit_event(record: &Record<'_>) {
    match tracing_level(record) {
        Level::ERROR => report_event!(Level::ERROR, record),
        Level::WARN => report_event!(Level::WARN, record),
        Level::INFO => report_event!(Level::INFO, record),
        Level::DEBUG => report_event!(Level::DEBUG, record),
        _ => report_event!(Level::TRACE, record),
    }
}
