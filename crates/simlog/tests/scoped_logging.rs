//! Integration tests for the call-site macros and scoped loggers.
//!
//! These tests drive the process-wide registry, so each one holds
//! `REGISTRY_LOCK` while it reconfigures levels.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use simlog::{
    DEFAULT_CATEGORY, LogLevel, MemorySink, ScopedLogger, Severity, Verbosity, VerbosityRegistry,
    sim_assert, sim_debug, sim_error, sim_fatal, sim_info, sim_trace, sim_traceall, sim_warn,
    tier, with_sink,
};

static REGISTRY_LOCK: Mutex<()> = Mutex::new(());

fn configure(level: LogLevel) -> MutexGuard<'static, ()> {
    let guard = REGISTRY_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let registry = VerbosityRegistry::global();
    registry.clear_categories();
    registry.set_level(level);
    guard
}

fn capture(f: impl FnOnce()) -> Vec<simlog::CapturedRecord> {
    let sink = Arc::new(MemorySink::new());
    with_sink(sink.clone(), f);
    sink.drain()
}

// ============================================================================
// Call-site filtering
// ============================================================================

#[test]
fn info_tiers_follow_global_level() {
    let _guard = configure(LogLevel::Debug);

    let records = capture(|| {
        sim_info!("info");
        sim_debug!("debug");
        sim_trace!("trace");
        sim_traceall!("traceall");
    });

    let messages: Vec<_> = records.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, ["info", "debug"]);
    assert_eq!(records[0].verbosity, Verbosity::MEDIUM);
    assert_eq!(records[1].verbosity, Verbosity::HIGH);
    assert!(records.iter().all(|r| r.severity == Severity::Info));
}

#[test]
fn warnings_and_errors_ignore_level() {
    let _guard = configure(LogLevel::None);

    let records = capture(|| {
        sim_info!("dropped");
        sim_warn!("warn");
        sim_error!("error");
        sim_fatal!("fatal");
    });

    let severities: Vec<_> = records.iter().map(|r| r.severity).collect();
    assert_eq!(
        severities,
        [Severity::Warning, Severity::Error, Severity::Fatal]
    );
}

#[test]
fn category_override_enables_single_category() {
    let _guard = configure(LogLevel::Warning);
    VerbosityRegistry::global().set_category_level("top.cpu", LogLevel::Trace);

    let owned = String::from("top.cpu.alu");
    let records = capture(|| {
        sim_trace!(category: "top.cpu", "cpu trace");
        sim_trace!(category: owned, "alu trace {}", 1);
        sim_trace!(category: "top.bus", "bus trace");
        sim_info!("default info");
    });

    let pairs: Vec<_> = records
        .iter()
        .map(|r| (r.category.as_str(), r.message.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [("top.cpu", "cpu trace"), ("top.cpu.alu", "alu trace 1")]
    );
}

#[test]
fn disabled_call_site_does_not_evaluate_arguments() {
    let _guard = configure(LogLevel::Info);
    let mut evaluated = false;
    let mut probe = || {
        evaluated = true;
        "expensive"
    };

    let records = capture(|| sim_debug!("{}", probe()));

    assert!(records.is_empty());
    assert!(!evaluated);
}

// ============================================================================
// Record contents
// ============================================================================

#[test]
fn macro_records_carry_call_site() {
    let _guard = configure(LogLevel::Warning);

    let line = line!() + 1;
    let records = capture(|| sim_warn!("at call site"));

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file, file!());
    assert_eq!(records[0].line, line);
    assert_eq!(records[0].category, DEFAULT_CATEGORY);
}

#[test]
fn scoped_logger_without_sink_uses_dispatch() {
    let _guard = configure(LogLevel::Warning);

    let records = capture(|| {
        let mut outer = ScopedLogger::<tier::Error>::new(file!(), line!(), Verbosity::MEDIUM);
        outer.category("outer").append("outer");
        {
            let mut inner = ScopedLogger::<tier::Warning>::new(file!(), line!(), Verbosity::MEDIUM);
            inner.append("inner ").append(2);
        }
        drop(outer);
    });

    let messages: Vec<_> = records.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, ["inner 2", "outer"]);
    assert_eq!(records[1].category, "outer");
}

#[test]
fn sim_assert_reports_failed_condition() {
    let _guard = configure(LogLevel::Warning);
    let value = 3;

    let records = capture(|| {
        sim_assert!(value == 3);
        sim_assert!(value > 5, "value was {}", value);
    });

    if cfg!(debug_assertions) {
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Fatal);
        assert_eq!(records[0].message, "assertion failed: value > 5: value was 3");
    } else {
        assert!(records.is_empty());
    }
}
