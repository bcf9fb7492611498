//! crates/simlog/src/dispatch.rs
//! Routing of records to the installed report sink.
//!
//! A record emitted without an explicit sink goes to, in order: the
//! innermost sink installed on the current thread with [`with_sink`], the
//! process-wide sink from [`set_global_sink`], and finally the fallback,
//! which forwards to `tracing` when that feature is enabled and writes a
//! plain line to standard error otherwise.

use std::cell::RefCell;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::record::{Record, ReportSink};

type SharedSink = Arc<dyn ReportSink>;

thread_local! {
    static SCOPED: RefCell<Vec<SharedSink>> = const { RefCell::new(Vec::new()) };
}

fn global_slot() -> &'static RwLock<Option<SharedSink>> {
    static GLOBAL: OnceLock<RwLock<Option<SharedSink>>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(None))
}

/// Installs the process-wide sink and returns the one it replaces.
pub fn set_global_sink(sink: Arc<dyn ReportSink>) -> Option<Arc<dyn ReportSink>> {
    global_slot()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(sink)
}

/// Removes the process-wide sink, returning it.
pub fn take_global_sink() -> Option<Arc<dyn ReportSink>> {
    global_slot()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// Runs `f` with `sink` receiving every dispatched record on this thread.
///
/// Calls nest; the innermost sink wins. The previous routing is restored
/// when `f` returns or unwinds.
pub fn with_sink<T>(sink: Arc<dyn ReportSink>, f: impl FnOnce() -> T) -> T {
    struct Restore;

    impl Drop for Restore {
        fn drop(&mut self) {
            SCOPED.with(|stack| {
                stack.borrow_mut().pop();
            });
        }
    }

    SCOPED.with(|stack| stack.borrow_mut().push(sink));
    let _restore = Restore;
    f()
}

/// Delivers `record` to the sink currently in effect.
pub fn dispatch(record: &Record<'_>) {
    let scoped = SCOPED.with(|stack| stack.borrow().last().cloned());
    if let Some(sink) = scoped {
        sink.report(record);
        return;
    }

    let global = global_slot()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    match global {
        Some(sink) => sink.report(record),
        None => fallback(record),
    }
}

#[cfg(feature = "tracing")]
fn fallback(record: &Record<'_>) {
    crate::tracing_bridge::emit_event(record);
}

#[cfg(not(feature = "tracing"))]
fn fallback(record: &Record<'_>) {
    eprintln!(
        "{}: {}: {}",
        record.severity, record.category, record.message
    );
}
