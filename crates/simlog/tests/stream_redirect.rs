//! Integration tests for redirecting a shared stream into the report pipeline.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use simlog::{
    LineForwarder, LogLevel, MemorySink, Severity, SharedStream, Verbosity, VerbosityRegistry,
    with_sink,
};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap_or_else(PoisonError::into_inner)).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Emulates a library that only knows how to write to a stream.
fn chatty_library(mut out: impl Write) -> io::Result<()> {
    write!(out, "abc")?;
    writeln!(out, "def")?;
    write!(out, "ghi\nxyz")?;
    Ok(())
}

#[test]
fn partial_writes_are_joined_into_lines() {
    let target = Captured::default();
    let stream = SharedStream::new(target.clone());
    let sink = Arc::new(MemorySink::new());
    let registry = Arc::new(VerbosityRegistry::with_level(LogLevel::Info));

    let mut redirect = stream.redirect_with(
        LineForwarder::new(LogLevel::Info)
            .with_registry(registry)
            .with_sink(sink.clone()),
    );
    chatty_library(&stream).unwrap();
    assert_eq!(sink.messages(), ["abcdef", "ghi"]);

    redirect.reset();
    redirect.reset();
    assert_eq!(sink.messages(), ["abcdef", "ghi", "xyz"]);
    assert!(
        sink.records()
            .iter()
            .all(|r| r.severity == Severity::Info && r.verbosity == Verbosity::MEDIUM)
    );
    assert!(target.text().is_empty());
}

#[test]
fn restored_stream_reaches_original_writer() {
    let target = Captured::default();
    let stream = SharedStream::new(target.clone());
    let sink = Arc::new(MemorySink::new());

    with_sink(sink.clone(), || {
        let _redirect = stream.redirect_with(
            LineForwarder::new(LogLevel::Error)
                .with_registry(Arc::new(VerbosityRegistry::new())),
        );
        chatty_library(&stream).unwrap();
    });
    writeln!(&stream, "plain").unwrap();

    assert_eq!(sink.messages(), ["abcdef", "ghi", "xyz"]);
    assert!(sink.records().iter().all(|r| r.severity == Severity::Error));
    assert_eq!(target.text(), "plain\n");
}

#[test]
fn gated_level_swallows_output() {
    let target = Captured::default();
    let stream = SharedStream::new(target.clone());
    let sink = Arc::new(MemorySink::new());

    {
        let _redirect = stream.redirect_with(
            LineForwarder::new(LogLevel::Trace)
                .with_registry(Arc::new(VerbosityRegistry::with_level(LogLevel::Debug)))
                .with_sink(sink.clone()),
        );
        chatty_library(&stream).unwrap();
    }

    assert!(sink.is_empty());
    assert!(target.text().is_empty());
}
