#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `simlog_sink` is the rendering and initialisation backend for
//! [`simlog`] records. It turns records into text lines, routes them
//! through a `tracing-subscriber` stack to the console and an optional log
//! file, and installs the global report sink.
//!
//! # Design
//!
//! - [`LogConfig`] carries every knob; [`init_logging`],
//!   [`init_logging_with`] and [`init_logging_with_clock`] consume it once.
//! - [`RecordFormatter`] owns the line layout. [`ReportFormat`] plugs it
//!   into `tracing-subscriber`; [`WriterSink`] uses it without tracing.
//! - [`SimClock`] supplies simulated time; [`ManualClock`] is driven by the
//!   caller.
//!
//! # Examples
//!
//! ```no_run
//! use simlog::LogLevel;
//! use simlog_sink::{LogConfig, init_logging_with};
//!
//! let _guard = init_logging_with(
//!     &LogConfig::default()
//!         .with_level(LogLevel::Info)
//!         .with_log_file("simulation.log"),
//! )?;
//! simlog::sim_info!("elaboration done");
//! # Ok::<(), simlog_sink::InitError>(())
//! ```

mod clock;
mod config;
mod error;
mod format;
mod init;
mod report_format;
mod writer_sink;

pub use clock::{ManualClock, SimClock, SimTime, render_time};
pub use config::{DEFAULT_CATEGORY_WIDTH, LogConfig};
pub use error::InitError;
pub use format::{RecordFormatter, level_style};
pub use init::{
    LoggingGuard, default_directives, init_logging, init_logging_with, init_logging_with_clock,
    level_filter,
};
pub use report_format::ReportFormat;
pub use writer_sink::WriterSink;
