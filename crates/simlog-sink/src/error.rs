//! crates/simlog-sink/src/error.rs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to install the logging backend.
#[derive(Debug, Error)]
pub enum InitError {
    /// The category filter is not a valid regular expression.
    #[error("invalid category filter: {0}")]
    InvalidFilter(#[from] regex::Error),
    /// `RUST_LOG` or the derived default directives could not be parsed.
    #[error("invalid filter directives: {0}")]
    InvalidDirectives(#[from] tracing_subscriber::filter::ParseError),
    /// The log file could not be created.
    #[error("failed to create log file {}: {source}", path.display())]
    LogFile {
        /// Requested log file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Another global subscriber was installed first.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}
