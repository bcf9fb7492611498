//! crates/simlog/src/record.rs
//! Report records and the sink seam they are emitted through.

use std::sync::{Mutex, PoisonError};

use crate::level::LogLevel;
use crate::severity::Severity;
use crate::verbosity::Verbosity;

/// Category reported for records that never had one assigned.
pub const DEFAULT_CATEGORY: &str = "SystemC";

/// One structured report, borrowed for the duration of a sink call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record<'a> {
    /// Coarse severity.
    pub severity: Severity,
    /// Category label; [`DEFAULT_CATEGORY`] when none was set.
    pub category: &'a str,
    /// Accumulated message text.
    pub message: &'a str,
    /// Verbosity the record was emitted at.
    pub verbosity: Verbosity,
    /// Source file of the emitting call site.
    pub file: &'a str,
    /// Source line of the emitting call site.
    pub line: u32,
}

impl Record<'_> {
    /// Returns the level this record is displayed as.
    ///
    /// Warning, error and fatal map directly; info-tier records resolve to
    /// the finer level their verbosity stands for.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        match self.severity {
            Severity::Fatal => LogLevel::Fatal,
            Severity::Error => LogLevel::Error,
            Severity::Warning => LogLevel::Warning,
            Severity::Info => match LogLevel::from_verbosity(self.verbosity) {
                LogLevel::None | LogLevel::Fatal | LogLevel::Error | LogLevel::Warning => {
                    LogLevel::Info
                }
                level => level,
            },
        }
    }

    /// Copies the record into owned storage.
    #[must_use]
    pub fn to_owned_record(&self) -> CapturedRecord {
        CapturedRecord {
            severity: self.severity,
            category: self.category.to_owned(),
            message: self.message.to_owned(),
            verbosity: self.verbosity,
            file: self.file.to_owned(),
            line: self.line,
        }
    }
}

/// Destination for emitted records.
///
/// Implementations decide rendering, storage, suppression, and what happens
/// after a fatal record. The core calls [`report`](Self::report) exactly once
/// per scoped logger or redirected line.
pub trait ReportSink: Send + Sync {
    /// Handles one record.
    fn report(&self, record: &Record<'_>);
}

impl<T> ReportSink for &T
where
    T: ReportSink + ?Sized,
{
    fn report(&self, record: &Record<'_>) {
        (**self).report(record);
    }
}

impl<T> ReportSink for std::sync::Arc<T>
where
    T: ReportSink + ?Sized,
{
    fn report(&self, record: &Record<'_>) {
        (**self).report(record);
    }
}

/// Owned copy of a [`Record`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapturedRecord {
    /// Coarse severity.
    pub severity: Severity,
    /// Category label.
    pub category: String,
    /// Message text.
    pub message: String,
    /// Verbosity the record was emitted at.
    pub verbosity: Verbosity,
    /// Source file.
    pub file: String,
    /// Source line.
    pub line: u32,
}

impl CapturedRecord {
    /// Borrows the captured record as a [`Record`].
    #[must_use]
    pub fn as_record(&self) -> Record<'_> {
        Record {
            severity: self.severity,
            category: &self.category,
            message: &self.message,
            verbosity: self.verbosity,
            file: &self.file,
            line: self.line,
        }
    }
}

/// Sink that keeps every record in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<CapturedRecord>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the captured records.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the captured messages only.
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|record| record.message.clone())
            .collect()
    }

    /// Removes and returns every captured record.
    pub fn drain(&self) -> Vec<CapturedRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the number of captured records.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Reports whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportSink for MemorySink {
    fn report(&self, record: &Record<'_>) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.to_owned_record());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(verbosity: Verbosity) -> Record<'static> {
        Record {
            severity: Severity::Info,
            category: DEFAULT_CATEGORY,
            message: "m",
            verbosity,
            file: "f.rs",
            line: 1,
        }
    }

    #[test]
    fn info_records_resolve_fine_levels() {
        assert_eq!(info(Verbosity::MEDIUM).level(), LogLevel::Info);
        assert_eq!(info(Verbosity::HIGH).level(), LogLevel::Debug);
        assert_eq!(info(Verbosity::FULL).level(), LogLevel::Trace);
        assert_eq!(info(Verbosity::DEBUG).level(), LogLevel::TraceAll);
        assert_eq!(info(Verbosity::NONE).level(), LogLevel::Info);
        assert_eq!(info(Verbosity::LOW).level(), LogLevel::Info);
    }

    #[test]
    fn other_severities_map_directly() {
        let mut record = info(Verbosity::MEDIUM);
        record.severity = Severity::Error;
        assert_eq!(record.level(), LogLevel::Error);
        record.severity = Severity::Fatal;
        assert_eq!(record.level(), LogLevel::Fatal);
    }

    #[test]
    fn memory_sink_keeps_order_and_drains() {
        let sink = MemorySink::new();
        let mut record = info(Verbosity::MEDIUM);
        sink.report(&record);
        record.message = "second";
        sink.report(&record);

        assert_eq!(sink.messages(), ["m", "second"]);
        assert_eq!(sink.drain().len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn captured_record_borrows_back() {
        let captured = info(Verbosity::HIGH).to_owned_record();
        assert_eq!(captured.as_record(), info(Verbosity::HIGH));
    }
}
