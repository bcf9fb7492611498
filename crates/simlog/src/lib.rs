#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `simlog` is a scoped, severity-aware logging facade for simulation models.
//! Call sites pick a severity and an optional category, check the category's
//! verbosity threshold, and build a [`ScopedLogger`] that emits a single
//! [`Record`] when it goes out of scope. A [`SharedStream`] lets code that only
//! knows [`io::Write`](std::io::Write) feed the same pipeline line by line.
//!
//! # Design
//!
//! - [`LogLevel`] is the user-facing ladder from `NONE` to `TRACEALL`. Each
//!   level maps onto a [`Verbosity`] on the numeric scale the report sink
//!   filters with.
//! - [`VerbosityRegistry`] holds the global level, per-category overrides
//!   and the cycle-count time base. [`VerbosityRegistry::global`] is the
//!   process-wide instance the macros consult; tests and embedders can build
//!   their own.
//! - [`ScopedLogger`] carries its severity as a type parameter (see
//!   [`tier`]). Only the info tier is filtered at the call site.
//! - Records go to a [`ReportSink`]. The innermost sink installed with
//!   [`with_sink`] wins, then the one from [`set_global_sink`], and without
//!   either the record is forwarded to `tracing` (feature `tracing`, on by
//!   default).
//!
//! # Invariants
//!
//! - A scoped logger emits exactly once, on drop, including during unwinding.
//! - Within a thread, records arrive in logger drop order.
//! - Warning, error and fatal call sites are never suppressed before the sink.
//! - A category override is independent of later global level changes.
//!
//! # Errors
//!
//! Parsing a level name strictly yields [`ParseLogLevelError`]; converting an
//! out-of-range integer yields [`InvalidLogLevel`]. [`LogLevel::from_int`]
//! and [`LogLevel::read_into`] keep the assertion and lenient behaviours of
//! configuration tooling.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use simlog::{LogLevel, MemorySink, VerbosityRegistry, sim_debug, sim_warn, with_sink};
//!
//! VerbosityRegistry::global().set_category_level("top.cpu", LogLevel::Debug);
//!
//! let sink = Arc::new(MemorySink::new());
//! with_sink(sink.clone(), || {
//!     sim_warn!("clock stopped at {} ns", 1200);
//!     sim_debug!(category: "top.cpu", "fetch 0x{:08x}", 0x8000_0000_u32);
//!     sim_debug!(category: "top.bus", "suppressed");
//! });
//!
//! assert_eq!(sink.messages(), ["clock stopped at 1200 ns", "fetch 0x80000000"]);
//! ```
//!
//! # See also
//!
//! - `simlog-sink` for the rendering backend and subscriber initialisation.

mod dispatch;
mod error;
mod level;
mod macros;
mod record;
mod redirect;
mod registry;
mod scoped;
mod severity;
#[cfg(feature = "tracing")]
mod tracing_bridge;
mod verbosity;

pub use dispatch::{dispatch, set_global_sink, take_global_sink, with_sink};
pub use error::{InvalidLogLevel, ParseLogLevelError};
pub use level::{LEVEL_NAMES, LogLevel};
pub use record::{CapturedRecord, DEFAULT_CATEGORY, MemorySink, Record, ReportSink};
pub use redirect::{LineForwarder, SharedStream, StreamRedirection};
pub use registry::{
    TimeDisplay, VerbosityRegistry, global_level, global_verbosity, set_cycle_base,
    set_global_level, verbosity_for,
};
pub use scoped::{ScopedLogger, enabled, enabled_in};
pub use severity::{Severity, SeverityTier, tier};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{FatalAction, REPORT_TARGET, TracingSink, emit_event, tracing_level};
pub use verbosity::Verbosity;
