//! crates/simlog-sink/src/writer_sink.rs

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use simlog::{Record, ReportSink, VerbosityRegistry};

use crate::format::RecordFormatter;

/// [`ReportSink`] that renders admitted records as lines into a writer.
///
/// Useful where no tracing subscriber is wanted, such as tests or tools
/// that capture a model's log into a buffer. Write errors are counted and
/// otherwise dropped because a sink cannot report them to the emitter.
///
/// ```
/// use simlog::{ScopedLogger, Verbosity, tier};
/// use simlog_sink::{RecordFormatter, WriterSink};
///
/// let sink = WriterSink::new(Vec::new(), RecordFormatter::plain());
/// ScopedLogger::<tier::Error>::with_sink(&sink, file!(), line!(), Verbosity::MEDIUM)
///     .category("top")
///     .append("bus error");
///
/// let text = String::from_utf8(sink.into_inner()).unwrap();
/// assert!(text.starts_with("ERROR: top "));
/// assert!(text.ends_with(": bus error\n"));
/// ```
pub struct WriterSink<W> {
    writer: Mutex<W>,
    formatter: RecordFormatter,
    registry: Option<Arc<VerbosityRegistry>>,
    failures: Mutex<u64>,
}

impl<W> WriterSink<W> {
    /// Creates a sink that suppresses through the process-wide registry.
    pub fn new(writer: W, formatter: RecordFormatter) -> Self {
        Self {
            writer: Mutex::new(writer),
            formatter,
            registry: None,
            failures: Mutex::new(0),
        }
    }

    /// Suppresses through `registry` instead.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<VerbosityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Returns the number of records that could not be written.
    pub fn failures(&self) -> u64 {
        *self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn registry(&self) -> &VerbosityRegistry {
        match self.registry.as_deref() {
            Some(registry) => registry,
            None => VerbosityRegistry::global(),
        }
    }
}

impl<W: Write> WriterSink<W> {
    fn write_line(&self, record: &Record<'_>) -> io::Result<()> {
        let mut line = self.formatter.format(record);
        line.push('\n');
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}

impl<W: Write + Send> ReportSink for WriterSink<W> {
    fn report(&self, record: &Record<'_>) {
        if !self.registry().admits(record) {
            return;
        }
        if self.write_line(record).is_err() {
            *self.failures.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        }
    }
}

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("formatter", &self.formatter)
            .field("failures", &self.failures())
            .finish_non_exhaustive()
    }
}
