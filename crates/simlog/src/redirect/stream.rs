//! crates/simlog/src/redirect/stream.rs

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::LineForwarder;
use crate::level::LogLevel;

type BoxedWriter = Box<dyn Write + Send>;

/// Writable stream whose destination can be swapped at runtime.
///
/// Writers hold a `&SharedStream` (which implements [`Write`]) and never see
/// the replacement. All writes and swaps are serialised by an internal lock,
/// so a sink that writes back into the same stream while a redirection is
/// active deadlocks.
pub struct SharedStream {
    writer: Mutex<BoxedWriter>,
}

impl SharedStream {
    /// Creates a stream that writes to `writer`.
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Creates a stream over the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates a stream over the process's standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    fn lock(&self) -> MutexGuard<'_, BoxedWriter> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs `writer` and returns the writer it replaces.
    pub fn replace_writer(&self, writer: BoxedWriter) -> BoxedWriter {
        std::mem::replace(&mut *self.lock(), writer)
    }

    /// Redirects the stream into the report pipeline at `level`.
    ///
    /// Only one redirection should be active per stream: stacking a second
    /// one makes the first restore a forwarder instead of the true writer.
    pub fn redirect(&self, level: LogLevel) -> StreamRedirection<'_> {
        self.redirect_with(LineForwarder::new(level))
    }

    /// Redirects the stream through a preconfigured forwarder.
    pub fn redirect_with(&self, forwarder: LineForwarder) -> StreamRedirection<'_> {
        #[cfg(feature = "tracing")]
        tracing::debug!(level = %forwarder.level(), "redirecting stream into report pipeline");
        let previous = self.replace_writer(Box::new(forwarder));
        StreamRedirection {
            stream: self,
            previous: Some(previous),
        }
    }
}

impl Write for &SharedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl Write for SharedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (&*self).write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self).flush()
    }
}

impl fmt::Debug for SharedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStream").finish_non_exhaustive()
    }
}

/// Guard for an active stream redirection.
///
/// Holds the writer that was installed before the redirection. Resetting
/// puts it back and reports any pending partial line; dropping the guard
/// resets it. The guard borrows the stream, so it cannot outlive it, and it
/// is not `Clone`.
#[must_use = "dropping the guard immediately restores the previous writer"]
pub struct StreamRedirection<'s> {
    stream: &'s SharedStream,
    previous: Option<BoxedWriter>,
}

impl StreamRedirection<'_> {
    /// Restores the previous writer and reports the pending partial line.
    ///
    /// Later calls do nothing.
    pub fn reset(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        let mut redirected = self.stream.replace_writer(previous);
        // The writer is not necessarily a LineForwarder once redirections stack.
        if let Err(error) = redirected.flush() {
            #[cfg(feature = "tracing")]
            tracing::debug!(%error, "flushing the redirected writer failed");
            #[cfg(not(feature = "tracing"))]
            drop(error);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("stream redirection reset");
    }

    /// Reports whether the redirection is still installed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.previous.is_some()
    }
}

impl Drop for StreamRedirection<'_> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl fmt::Debug for StreamRedirection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamRedirection")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MemorySink;
    use crate::registry::VerbosityRegistry;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Shared {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn forwarder(sink: &Arc<MemorySink>) -> LineForwarder {
        LineForwarder::new(LogLevel::Warning)
            .with_registry(Arc::new(VerbosityRegistry::new()))
            .with_sink(sink.clone())
    }

    #[test]
    fn redirection_captures_and_restores() {
        let target = Shared::default();
        let stream = SharedStream::new(target.clone());
        let sink = Arc::new(MemorySink::new());

        writeln!(&stream, "before").unwrap();
        {
            let mut redirect = stream.redirect_with(forwarder(&sink));
            assert!(redirect.is_active());
            write!(&stream, "abc").unwrap();
            writeln!(&stream, "def").unwrap();
            write!(&stream, "ghi\nxyz").unwrap();
            assert_eq!(sink.messages(), ["abcdef", "ghi"]);

            redirect.reset();
            assert!(!redirect.is_active());
            assert_eq!(sink.messages(), ["abcdef", "ghi", "xyz"]);

            redirect.reset();
            assert_eq!(sink.len(), 3);
        }
        writeln!(&stream, "after").unwrap();

        assert_eq!(target.contents(), "before\nafter\n");
        assert_eq!(sink.len(), 3);
    }

    struct FailingFlush;

    impl Write for FailingFlush {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn reset_restores_even_when_replaced_writer_fails_to_flush() {
        let target = Shared::default();
        let stream = SharedStream::new(target.clone());
        let sink = Arc::new(MemorySink::new());

        let mut redirect = stream.redirect_with(forwarder(&sink));
        let forwarder = stream.replace_writer(Box::new(FailingFlush));
        drop(forwarder);
        redirect.reset();
        assert!(!redirect.is_active());

        write!(&stream, "restored").unwrap();
        assert_eq!(target.contents(), "restored");
    }

    #[test]
    fn drop_restores_and_flushes_once() {
        let target = Shared::default();
        let stream = SharedStream::new(target.clone());
        let sink = Arc::new(MemorySink::new());

        {
            let _redirect = stream.redirect_with(forwarder(&sink));
            write!(&stream, "tail only").unwrap();
        }

        assert_eq!(sink.messages(), ["tail only"]);
        write!(&stream, "direct").unwrap();
        assert_eq!(target.contents(), "direct");
    }

    #[test]
    fn replace_writer_returns_previous() {
        let first = Shared::default();
        let second = Shared::default();
        let stream = SharedStream::new(first.clone());

        let mut old = stream.replace_writer(Box::new(second.clone()));
        old.write_all(b"via old").unwrap();
        write!(&stream, "via stream").unwrap();

        assert_eq!(first.contents(), "via old");
        assert_eq!(second.contents(), "via stream");
    }
}
