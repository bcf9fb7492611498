//! crates/simlog-sink/src/report_format.rs
//! `tracing-subscriber` event format that renders simlog records.

use std::fmt;

use simlog::{REPORT_TARGET, Record, Severity, Verbosity};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::registry::LookupSpan;

use crate::format::RecordFormatter;

/// Event format that turns [`REPORT_TARGET`] events back into records and
/// renders them with a [`RecordFormatter`].
///
/// Events from other targets are rendered the same way, with the target as
/// category and the tracing level mapped onto a severity, so the library's
/// own diagnostics share the layout.
#[derive(Clone, Debug, Default)]
pub struct ReportFormat {
    formatter: RecordFormatter,
}

impl ReportFormat {
    /// Wraps `formatter`.
    #[must_use]
    pub const fn new(formatter: RecordFormatter) -> Self {
        Self { formatter }
    }

    /// Returns the wrapped formatter.
    #[must_use]
    pub const fn formatter(&self) -> &RecordFormatter {
        &self.formatter
    }
}

/// Collects simlog fields from an event.
#[derive(Default)]
struct RecordFields {
    message: String,
    category: Option<String>,
    severity: Option<Severity>,
    verbosity: Option<u64>,
    file: Option<String>,
    line: Option<u64>,
    extra: String,
}

impl RecordFields {
    fn push_extra(&mut self, name: &str, value: fmt::Arguments<'_>) {
        use std::fmt::Write as _;
        let _ = write!(self.extra, " {name}={value}");
    }
}

impl Visit for RecordFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => value.clone_into(&mut self.message),
            "category" => self.category = Some(value.to_owned()),
            "severity" => self.severity = Severity::from_label(value),
            "file" => self.file = Some(value.to_owned()),
            name => self.push_extra(name, format_args!("{value}")),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "verbosity" => self.verbosity = Some(value),
            "line" => self.line = Some(value),
            name => self.push_extra(name, format_args!("{value}")),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            name => self.push_extra(name, format_args!("{value:?}")),
        }
    }
}

fn severity_for(level: Level) -> (Severity, Verbosity) {
    match level {
        Level::ERROR => (Severity::Error, Verbosity::MEDIUM),
        Level::WARN => (Severity::Warning, Verbosity::MEDIUM),
        Level::INFO => (Severity::Info, Verbosity::MEDIUM),
        Level::DEBUG => (Severity::Info, Verbosity::HIGH),
        _ => (Severity::Info, Verbosity::FULL),
    }
}

impl<S, N> FormatEvent<S, N> for ReportFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut fields = RecordFields::default();
        event.record(&mut fields);

        let (fallback_severity, fallback_verbosity) = severity_for(*metadata.level());
        let is_report = metadata.target() == REPORT_TARGET;
        let severity = fields
            .severity
            .filter(|_| is_report)
            .unwrap_or(fallback_severity);
        let verbosity = fields
            .verbosity
            .filter(|_| is_report)
            .and_then(|value| u32::try_from(value).ok())
            .map_or(fallback_verbosity, Verbosity::new);

        let mut message = fields.message;
        if !is_report {
            message.push_str(&fields.extra);
        }

        let record = Record {
            severity,
            category: fields.category.as_deref().unwrap_or(metadata.target()),
            message: &message,
            verbosity,
            file: fields
                .file
                .as_deref()
                .or(metadata.file())
                .unwrap_or_default(),
            line: fields
                .line
                .and_then(|line| u32::try_from(line).ok())
                .or(metadata.line())
                .unwrap_or_default(),
        };

        let colored = self.formatter.is_colored() && writer.has_ansi_escapes();
        self.formatter.write_record(&mut writer, &record, colored)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .event_format(ReportFormat::new(RecordFormatter::plain()))
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer.text()
    }

    #[test]
    fn report_events_are_rendered_as_records() {
        let output = capture(|| {
            simlog::emit_event(&Record {
                severity: Severity::Info,
                category: "top.mem",
                message: "refresh",
                verbosity: Verbosity::FULL,
                file: "mem.rs",
                line: 3,
            });
        });
        assert_eq!(output, format!("TRACE: {:<24}: refresh\n", "top.mem"));
    }

    #[test]
    fn foreign_events_use_target_as_category() {
        let output = capture(|| {
            tracing::warn!(target: "bus", addr = 16, "retry");
        });
        assert_eq!(output, format!("WARNING: {:<24}: retry addr=16\n", "bus"));
    }
}
