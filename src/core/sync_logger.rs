//! Synchronous strategy: the caller emits its own record under a lock

use super::error::Result;
use super::log_level::LogLevel;
use super::log_record::{Location, LogRecord};
use super::metrics::LoggerMetrics;
use super::pipe::Pipeline;
use super::strategy::LogStrategy;
use parking_lot::Mutex;

/// Serializes every record through one pipe
///
/// The record is built while the lock is held, so the order of records in
/// the sink is the order in which callers acquired the lock, and their
/// timestamps never go backwards. Emitter failures are returned to the
/// caller of `log`; nothing is retried or swallowed here.
///
/// # Example
///
/// ```
/// use pipe_logger::core::{LogLevel, LogStrategy, Pipe, SyncLogger};
/// use pipe_logger::emitters::MemoryEmitter;
///
/// let (emitter, sink) = MemoryEmitter::new();
/// let logger = SyncLogger::new(Pipe::with_default_formatter(emitter))
///     .with_min_level(LogLevel::Info);
///
/// logger.log(LogLevel::Debug, "dropped".into(), None).unwrap();
/// logger.log(LogLevel::Info, "kept".into(), None).unwrap();
/// assert_eq!(sink.len(), 1);
/// ```
pub struct SyncLogger<P> {
    pipe: Mutex<P>,
    min_level: LogLevel,
    metrics: LoggerMetrics,
}

impl<P: Pipeline> SyncLogger<P> {
    /// Logger that accepts every level
    pub fn new(pipe: P) -> Self {
        Self {
            pipe: Mutex::new(pipe),
            min_level: LogLevel::Trace,
            metrics: LoggerMetrics::new(),
        }
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Recover the pipe, e.g. to inspect its sink
    pub fn into_pipe(self) -> P {
        self.pipe.into_inner()
    }
}

impl<P: Pipeline> LogStrategy for SyncLogger<P> {
    fn log(&self, level: LogLevel, message: String, location: Option<Location>) -> Result<()> {
        if level < self.min_level {
            return Ok(());
        }

        // Guard drops on every exit path, unwinding included
        let mut pipe = self.pipe.lock();
        let record = LogRecord::new(level, message, location);
        match pipe.process(&record) {
            Ok(()) => {
                self.metrics.record_emitted();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failed();
                Err(e)
            }
        }
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn flush(&self) -> Result<()> {
        self.pipe.lock().flush()
    }

    fn shutdown(&self) -> Result<()> {
        self.flush()
    }

    fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn name(&self) -> &str {
        "sync"
    }
}
