//! crates/simlog/src/redirect/forwarder.rs

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use memchr::memchr;

use crate::level::LogLevel;
use crate::record::ReportSink;
use crate::registry::VerbosityRegistry;
use crate::scoped::ScopedLogger;
use crate::severity::{SeverityTier, tier};
use crate::verbosity::Verbosity;

/// [`io::Write`] decorator that re-emits each written line as a record.
///
/// Bytes are split on `\n`. Every complete line is reported without its
/// terminator; the bytes after the last newline stay pending and are joined
/// with the next write. [`flush`](Write::flush) and drop report the pending
/// partial line, if any.
///
/// Lines are consumed but not reported while the forwarder's level is
/// [`LogLevel::None`] or more verbose than the registry's global level.
///
/// Levels map onto records as follows:
///
/// | level                   | severity | verbosity                      |
/// |-------------------------|----------|--------------------------------|
/// | `FATAL`, `ERROR`, `WARNING` | same     | `MEDIUM`                    |
/// | `INFO`, `DEBUG`, `TRACE`, `TRACEALL` | info | `MEDIUM`, `HIGH`, `FULL`, `DEBUG` |
pub struct LineForwarder {
    level: LogLevel,
    pending: Vec<u8>,
    category: Option<String>,
    registry: Option<Arc<VerbosityRegistry>>,
    sink: Option<Arc<dyn ReportSink>>,
}

impl LineForwarder {
    /// Creates a forwarder reporting at `level` through the current sink.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self {
            level,
            pending: Vec::new(),
            category: None,
            registry: None,
            sink: None,
        }
    }

    /// Gates lines on `registry` instead of the process-wide registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<VerbosityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Reports into `sink` instead of the sink currently in effect.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Tags forwarded lines with `category` instead of the default one.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the level lines are reported at.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Returns the bytes written since the last newline.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    fn registry(&self) -> &VerbosityRegistry {
        match self.registry.as_deref() {
            Some(registry) => registry,
            None => VerbosityRegistry::global(),
        }
    }

    fn is_open(&self) -> bool {
        self.level != LogLevel::None && self.level <= self.registry().level()
    }

    fn emit_line(&self, line: &[u8]) {
        if !self.is_open() {
            return;
        }
        let text = String::from_utf8_lossy(line);
        match self.level {
            LogLevel::None => {}
            LogLevel::Fatal => self.emit::<tier::Fatal>(&text, Verbosity::MEDIUM),
            LogLevel::Error => self.emit::<tier::Error>(&text, Verbosity::MEDIUM),
            LogLevel::Warning => self.emit::<tier::Warning>(&text, Verbosity::MEDIUM),
            LogLevel::Info => self.emit::<tier::Info>(&text, Verbosity::MEDIUM),
            LogLevel::Debug => self.emit::<tier::Info>(&text, Verbosity::HIGH),
            LogLevel::Trace => self.emit::<tier::Info>(&text, Verbosity::FULL),
            LogLevel::TraceAll => self.emit::<tier::Info>(&text, Verbosity::DEBUG),
        }
    }

    fn emit<S: SeverityTier>(&self, text: &str, verbosity: Verbosity) {
        let mut logger = match &self.sink {
            Some(sink) => ScopedLogger::<S>::with_sink(&**sink, file!(), line!(), verbosity),
            None => ScopedLogger::<S>::new(file!(), line!(), verbosity),
        };
        logger.set_category(self.category.as_deref()).append(text);
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.pending);
        self.emit_line(&line);
    }
}

impl Write for LineForwarder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while let Some(pos) = memchr(b'\n', rest) {
            self.pending.extend_from_slice(&rest[..pos]);
            let mut line = std::mem::take(&mut self.pending);
            self.emit_line(&line);
            line.clear();
            self.pending = line;
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending();
        Ok(())
    }
}

impl Drop for LineForwarder {
    fn drop(&mut self) {
        self.flush_pending();
    }
}

impl fmt::Debug for LineForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineForwarder")
            .field("level", &self.level)
            .field("pending", &String::from_utf8_lossy(&self.pending))
            .field("category", &self.category)
            .field("registry", &self.registry.is_some())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
