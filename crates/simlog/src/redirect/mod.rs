//! crates/simlog/src/redirect/mod.rs
//! Folding stream output into the report pipeline.
//!
//! Code that only knows how to write to an [`io::Write`](std::io::Write)
//! can be pointed at a [`SharedStream`]. Calling
//! [`SharedStream::redirect`] swaps the stream's writer for a
//! [`LineForwarder`], which turns every complete line into one record at a
//! fixed level. The returned [`StreamRedirection`] puts the previous writer
//! back when it is reset or dropped.
//!
//! ```
//! use std::io::Write;
//! use std::sync::Arc;
//! use simlog::{LogLevel, MemorySink, SharedStream, with_sink};
//!
//! let sink = Arc::new(MemorySink::new());
//! let stream = SharedStream::new(std::io::sink());
//!
//! with_sink(sink.clone(), || {
//!     let _redirect = stream.redirect(LogLevel::Warning);
//!     write!(&stream, "first line\nsecond ").unwrap();
//!     writeln!(&stream, "line").unwrap();
//! });
//!
//! assert_eq!(sink.messages(), ["first line", "second line"]);
//! ```

mod forwarder;
mod stream;

pub use self::forwarder::LineForwarder;
pub use self::stream::{SharedStream, StreamRedirection};
