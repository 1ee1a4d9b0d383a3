//! Line writer over any already-open stream

use crate::core::{Emitter, LoggerError, Result};
use std::io::Write;

/// When a [`StreamEmitter`] flushes its stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Leave flushing to the stream's own buffering
    #[default]
    Buffered,
    /// Flush after every record, for per-call durability
    EveryRecord,
}

/// Writes each record followed by `\n` to a caller-supplied stream
///
/// The emitter never opens or closes anything; it holds the stream for its
/// lifetime and flushes it when dropped. Wrap files in a `BufWriter` to keep
/// the hot path cheap.
///
/// # Example
///
/// ```
/// use pipe_logger::emitters::{FlushPolicy, StreamEmitter};
/// use pipe_logger::core::Emitter;
///
/// let mut emitter = StreamEmitter::new(Vec::new()).with_flush_policy(FlushPolicy::EveryRecord);
/// emitter.write("[INFO ][t][-] hello").unwrap();
/// assert_eq!(emitter.get_ref(), b"[INFO ][t][-] hello\n");
/// ```
pub struct StreamEmitter<W: Write + Send> {
    writer: W,
    flush_policy: FlushPolicy,
}

impl<W: Write + Send> StreamEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            flush_policy: FlushPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.flush_policy = policy;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    fn write_line(&mut self, rendered: &str) -> std::io::Result<()> {
        self.writer.write_all(rendered.as_bytes())?;
        self.writer.write_all(b"\n")?;
        if self.flush_policy == FlushPolicy::EveryRecord {
            self.writer.flush()?;
        }
        Ok(())
    }
}

impl<W: Write + Send> Emitter for StreamEmitter<W> {
    fn write(&mut self, rendered: &str) -> Result<()> {
        self.write_line(rendered)
            .map_err(|e| LoggerError::emitter_write("stream", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LoggerError::emitter_write("stream", e))
    }

    fn name(&self) -> &str {
        "stream"
    }
}

impl<W: Write + Send> Drop for StreamEmitter<W> {
    fn drop(&mut self) {
        // Ensure all buffered data reaches the stream
        let _ = self.writer.flush();
    }
}
