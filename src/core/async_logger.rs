//! Asynchronous strategy: records are emitted by a worker pool
//!
//! `log` builds the record on the calling thread (so the timestamp reflects
//! the call, not the queueing delay), stamps it with a sequence number and
//! hands it to the [`Pool`]. Workers park records in a sequencer and then
//! drain it strictly in sequence order under the pipe lock; a record that
//! arrives early waits in the sequencer until its predecessors are through.
//! No worker waits for a particular predecessor, records from one producer
//! come out in the order they were logged, and the sink sees one writer at
//! a time.
//!
//! The sequencer and the pipe have separate locks. A producer whose record
//! could not be queued only marks the gap under the sequencer lock, so a
//! slow sink never stalls `log`.

use super::error::{panic_message, LoggerError, Result};
use super::log_level::LogLevel;
use super::log_record::{Location, LogRecord};
use super::metrics::LoggerMetrics;
use super::overflow_policy::{AsyncErrorPolicy, OverflowPolicy};
use super::pipe::Pipeline;
use super::strategy::LogStrategy;
use crate::concurrency::pool::{Pool, SubmitMode};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ordering state; only ever held for a map operation, never across I/O
struct Sequencer {
    /// Sequence number of the next record to process
    next: u64,
    /// Arrivals not yet processed; `None` marks a sequence number that will never come
    parked: BTreeMap<u64, Option<LogRecord>>,
}

impl Sequencer {
    /// Take the entry for `next` if it has arrived
    fn take_ready(&mut self) -> Option<Option<LogRecord>> {
        let entry = self.parked.remove(&self.next)?;
        self.next += 1;
        Some(entry)
    }
}

struct Shared<P> {
    sequencer: Mutex<Sequencer>,
    pipe: Mutex<P>,
    metrics: LoggerMetrics,
    error_policy: AsyncErrorPolicy,
}

impl<P: Pipeline> Shared<P> {
    /// Worker side: hand over the record carrying `seq`, then drain
    fn deliver(&self, seq: u64, record: LogRecord) {
        self.sequencer.lock().parked.insert(seq, Some(record));
        self.drain();
    }

    /// Producer side: mark `seq` as never arriving
    ///
    /// Touches only the ordering lock. Returns true when the gap is next in
    /// line, i.e. records behind it may now be ready and need a drainer.
    fn skip(&self, seq: u64) -> bool {
        let mut sequencer = self.sequencer.lock();
        sequencer.parked.insert(seq, None);
        seq == sequencer.next
    }

    /// Process every entry that is ready, in sequence order
    ///
    /// Entries are taken and processed while the pipe lock is held, so two
    /// drainers never interleave. Whoever inserts an entry drains afterwards,
    /// so an entry that lands after a drainer's last check is not stranded.
    fn drain(&self) {
        let mut failures = Vec::new();
        {
            let mut pipe = self.pipe.lock();
            loop {
                let entry = self.sequencer.lock().take_ready();
                match entry {
                    Some(Some(record)) => {
                        if let Some(error) = self.emit(&mut *pipe, &record) {
                            failures.push(error);
                        }
                    }
                    Some(None) => {}
                    None => break,
                }
            }
        }
        // Reported with no lock held, so a callback may log again
        self.report(failures);
    }

    /// Process whatever is still parked, skipping gaps
    fn drain_parked(&self) {
        let mut failures = Vec::new();
        {
            let mut pipe = self.pipe.lock();
            loop {
                let entry = {
                    let mut sequencer = self.sequencer.lock();
                    sequencer.parked.pop_first().map(|(seq, entry)| {
                        sequencer.next = seq + 1;
                        entry
                    })
                };
                match entry {
                    Some(Some(record)) => {
                        if let Some(error) = self.emit(&mut *pipe, &record) {
                            failures.push(error);
                        }
                    }
                    Some(None) => {}
                    None => break,
                }
            }
        }
        self.report(failures);
    }

    fn emit(&self, pipe: &mut P, record: &LogRecord) -> Option<(LoggerError, u64)> {
        // A panicking emitter must not leave the sequencer stuck
        let outcome = catch_unwind(AssertUnwindSafe(|| pipe.process(record)));
        let error = match outcome {
            Ok(Ok(())) => {
                self.metrics.record_emitted();
                return None;
            }
            Ok(Err(e)) => e,
            Err(payload) => LoggerError::task_failed(format!(
                "pipe panicked: {}",
                panic_message(payload.as_ref())
            )),
        };
        let occurrence = self.metrics.record_failed();
        Some((error, occurrence))
    }

    fn report(&self, failures: Vec<(LoggerError, u64)>) {
        for (error, occurrence) in failures {
            self.error_policy.report(&error, occurrence);
        }
    }
}

/// Worker-pool backed logger
///
/// Every record accepted before [`shutdown`](LogStrategy::shutdown) (or
/// drop) is emitted exactly once before it returns. Records logged after
/// shutdown are refused with [`LoggerError::LoggerStopped`].
///
/// Emission failures cannot reach the original caller; they go to the
/// configured [`AsyncErrorPolicy`] and are counted in the metrics.
///
/// # Example
///
/// ```
/// use pipe_logger::core::{AsyncLogger, LogLevel, LogStrategy, Pipe};
/// use pipe_logger::emitters::MemoryEmitter;
///
/// let (emitter, sink) = MemoryEmitter::new();
/// let logger = AsyncLogger::new(Pipe::with_default_formatter(emitter), 2, Some(64)).unwrap();
///
/// for i in 0..10 {
///     logger.log(LogLevel::Info, format!("message {}", i), None).unwrap();
/// }
/// logger.shutdown().unwrap();
/// assert_eq!(sink.len(), 10);
/// ```
pub struct AsyncLogger<P: Pipeline + 'static> {
    shared: Arc<Shared<P>>,
    pool: Pool,
    next_seq: AtomicU64,
    min_level: LogLevel,
    overflow_policy: OverflowPolicy,
}

impl<P: Pipeline + 'static> AsyncLogger<P> {
    /// Create a logger with `workers` threads and an optional queue bound
    ///
    /// Fails with `InvalidConfiguration` for zero workers or a zero bound.
    pub fn new(pipe: P, workers: usize, queue_bound: Option<usize>) -> Result<Self> {
        let pool = Pool::with_queue_bound(workers, queue_bound)?;
        Ok(Self {
            shared: Arc::new(Shared {
                sequencer: Mutex::new(Sequencer {
                    next: 0,
                    parked: BTreeMap::new(),
                }),
                pipe: Mutex::new(pipe),
                metrics: LoggerMetrics::new(),
                error_policy: AsyncErrorPolicy::default(),
            }),
            pool,
            next_seq: AtomicU64::new(0),
            min_level: LogLevel::Trace,
            overflow_policy: OverflowPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Set where async failures are reported
    ///
    /// Must be called before the first record is logged.
    #[must_use]
    pub fn with_error_policy(mut self, policy: AsyncErrorPolicy) -> Self {
        match Arc::get_mut(&mut self.shared) {
            Some(shared) => shared.error_policy = policy,
            None => eprintln!(
                "[LOGGER WARNING] Error policy ignored: logger already has records in flight"
            ),
        }
        self
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Records queued but not yet picked up by a worker
    pub fn pending(&self) -> usize {
        self.pool.pending()
    }

    /// Ask a worker to drain records that were waiting on a gap
    ///
    /// Never blocks. If the queue is full, the queued tasks drain when they
    /// run; if the pool is closed, shutdown drains what is left.
    fn schedule_drain(&self) {
        let shared = Arc::clone(&self.shared);
        let _ = self
            .pool
            .submit(Box::new(move || shared.drain()), SubmitMode::Try);
    }

    fn submit_mode(&self) -> SubmitMode {
        let full = self
            .pool
            .queue_bound()
            .is_some_and(|bound| self.pool.pending() >= bound);
        if full {
            self.shared.metrics.record_queue_full();
        }

        match self.overflow_policy {
            OverflowPolicy::Block => {
                if full {
                    self.shared.metrics.record_block();
                }
                SubmitMode::Block
            }
            OverflowPolicy::BlockWithTimeout(timeout) => {
                if full {
                    self.shared.metrics.record_block();
                }
                SubmitMode::Timeout(timeout)
            }
            OverflowPolicy::DropNewest => SubmitMode::Try,
        }
    }
}

impl<P: Pipeline + 'static> LogStrategy for AsyncLogger<P> {
    fn log(&self, level: LogLevel, message: String, location: Option<Location>) -> Result<()> {
        if level < self.min_level {
            return Ok(());
        }

        let record = LogRecord::new(level, message, location);
        let mode = self.submit_mode();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let shared = Arc::clone(&self.shared);

        let submitted = self
            .pool
            .submit(Box::new(move || shared.deliver(seq, record)), mode);

        match submitted {
            Ok(()) => Ok(()),
            Err(e) => {
                // Mark the gap so later records are not held back by it
                if self.shared.skip(seq) {
                    self.schedule_drain();
                }
                match e {
                    LoggerError::QueueFull { .. } => {
                        let occurrence = self.shared.metrics.record_dropped();
                        self.shared.error_policy.report(&e, occurrence);
                        Ok(())
                    }
                    LoggerError::PoolClosed => {
                        self.shared.metrics.record_rejected();
                        Err(LoggerError::LoggerStopped)
                    }
                    other => Err(other),
                }
            }
        }
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Flush the sink; records still queued are not waited for
    fn flush(&self) -> Result<()> {
        self.shared.pipe.lock().flush()
    }

    fn shutdown(&self) -> Result<()> {
        self.pool.join()?;
        self.shared.drain_parked();
        self.flush()
    }

    fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    fn name(&self) -> &str {
        "async"
    }
}

impl<P: Pipeline + 'static> Drop for AsyncLogger<P> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            eprintln!("[LOGGER ERROR] Failed to shut down async logger: {}", e);
        }

        let lost = self.shared.metrics.lost_count();
        if lost > 0 && !self.shared.error_policy.is_silent() {
            eprintln!(
                "[LOGGER WARNING] Async logger shutting down with {} lost records (failure rate: {:.2}%)",
                lost,
                self.shared.metrics.failure_rate()
            );
        }
    }
}
