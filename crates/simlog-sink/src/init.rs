//! crates/simlog-sink/src/init.rs
//! One-shot installation of the tracing subscriber and the global report sink.

use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use regex::Regex;
use simlog::{LogLevel, REPORT_TARGET, TracingSink, VerbosityRegistry};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::clock::SimClock;
use crate::config::LogConfig;
use crate::error::InitError;
use crate::format::RecordFormatter;
use crate::report_format::ReportFormat;

/// Worker of the non-blocking log file writer.
///
/// Lives outside [`LoggingGuard`] so the fatal path can flush it before the
/// process aborts.
static FILE_WORKER: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Drops the file worker, which writes out every queued line.
fn flush_file_worker() {
    let worker = FILE_WORKER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    drop(worker);
}

/// Keeps the logging backend's background resources alive.
///
/// Dropping the guard flushes the non-blocking log file writer. Hold it for
/// the lifetime of the simulation.
#[must_use = "dropping the guard stops background log file writes"]
#[derive(Debug)]
pub struct LoggingGuard {
    _private: (),
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        flush_file_worker();
    }
}

/// Maps a level onto the tracing filter used for non-report targets.
#[must_use]
pub const fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::None => LevelFilter::OFF,
        LogLevel::Fatal | LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warning => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace | LogLevel::TraceAll => LevelFilter::TRACE,
    }
}

/// Default filter directives when `RUST_LOG` is unset.
///
/// Report events always pass; suppression of records happens in the
/// [`TracingSink`] against the verbosity registry.
#[must_use]
pub fn default_directives(level: LogLevel) -> String {
    format!("{},{REPORT_TARGET}=trace", level_filter(level))
}

fn env_filter(level: LogLevel) -> Result<EnvFilter, InitError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_directives(level));
    Ok(EnvFilter::try_new(directives)?)
}

/// Installs logging at `level` with the given category width, optionally
/// prefixing wall-clock time.
pub fn init_logging(
    level: LogLevel,
    category_width: usize,
    print_sys_time: bool,
) -> Result<LoggingGuard, InitError> {
    init_logging_with(&LogConfig::from_basic(level, category_width, print_sys_time))
}

/// Installs logging from `config` without a simulated time source.
pub fn init_logging_with(config: &LogConfig) -> Result<LoggingGuard, InitError> {
    install(config, None)
}

/// Installs logging from `config`, stamping records with `clock`.
pub fn init_logging_with_clock(
    config: &LogConfig,
    clock: Arc<dyn SimClock>,
) -> Result<LoggingGuard, InitError> {
    install(config, Some(clock))
}

fn install(
    config: &LogConfig,
    clock: Option<Arc<dyn SimClock>>,
) -> Result<LoggingGuard, InitError> {
    let category_filter = config
        .category_filter
        .as_deref()
        .map(Regex::new)
        .transpose()?;

    let mut formatter = RecordFormatter::from_config(config);
    if let Some(clock) = clock {
        formatter = formatter.with_clock(clock);
    }

    let console = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.colored_output)
        .event_format(ReportFormat::new(formatter.clone()));

    let (file_layer, file_worker) = match config.log_file() {
        Some(path) => {
            let file = File::create(path).map_err(|source| InitError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
            let (writer, worker) = if config.log_async {
                let (writer, worker) = tracing_appender::non_blocking(file);
                (BoxMakeWriter::new(writer), Some(worker))
            } else {
                (BoxMakeWriter::new(Mutex::new(file)), None)
            };
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .event_format(ReportFormat::new(formatter.with_colored(false)));
            (Some(layer), worker)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(config.level)?)
        .with(console)
        .with(file_layer)
        .try_init()?;

    *FILE_WORKER.lock().unwrap_or_else(PoisonError::into_inner) = file_worker;
    VerbosityRegistry::global().set_level(config.level);

    let mut sink = TracingSink::new().with_fatal_hook(flush_file_worker);
    if let Some(regex) = category_filter {
        sink = sink.with_category_filter(move |category| regex.is_match(category));
    }
    simlog::set_global_sink(Arc::new(sink));

    tracing::debug!(
        level = %config.level,
        log_file = ?config.log_file(),
        async_file = config.log_async,
        "logging initialised"
    );
    if config.dont_create_broker {
        tracing::debug!("broker creation disabled; no broker is managed here");
    }

    Ok(LoggingGuard { _private: () })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filters_follow_levels() {
        assert_eq!(level_filter(LogLevel::None), LevelFilter::OFF);
        assert_eq!(level_filter(LogLevel::Fatal), LevelFilter::ERROR);
        assert_eq!(level_filter(LogLevel::Warning), LevelFilter::WARN);
        assert_eq!(level_filter(LogLevel::TraceAll), LevelFilter::TRACE);
    }

    #[test]
    fn default_directives_always_admit_reports() {
        assert_eq!(default_directives(LogLevel::Warning), "warn,simlog::report=trace");
        assert_eq!(default_directives(LogLevel::None), "off,simlog::report=trace");
        assert!(EnvFilter::try_new(default_directives(LogLevel::Debug)).is_ok());
    }

    #[test]
    fn invalid_category_filter_is_rejected_before_installing() {
        let config = LogConfig::default().with_category_filter("(unclosed");
        let error = init_logging_with(&config).unwrap_err();
        assert!(matches!(error, InitError::InvalidFilter(_)));
    }
}
