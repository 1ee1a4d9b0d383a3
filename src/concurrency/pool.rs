//! Fixed-size worker pool with a shared FIFO task queue

use crate::core::error::panic_message;
use crate::core::{LoggerError, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// How `submit` behaves when a bounded queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubmitMode {
    Block,
    Timeout(Duration),
    Try,
}

/// Completion handle for one task
///
/// A panic inside the task is caught on the worker and surfaces here as
/// [`LoggerError::TaskFailed`]; the worker keeps running.
#[must_use = "dropping a TaskHandle discards the task's result"]
pub struct TaskHandle<R> {
    outcome: Receiver<std::result::Result<R, String>>,
}

impl<R> TaskHandle<R> {
    /// Block until the task finishes
    pub fn wait(self) -> Result<R> {
        match self.outcome.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(LoggerError::task_failed(message)),
            Err(_) => Err(LoggerError::task_failed("task dropped before completion")),
        }
    }

    /// Wait at most `timeout`; `Ok(None)` if the task is still running
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<R>> {
        match self.outcome.recv_timeout(timeout) {
            Ok(Ok(value)) => Ok(Some(value)),
            Ok(Err(message)) => Err(LoggerError::task_failed(message)),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => Ok(None),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                Err(LoggerError::task_failed("task dropped before completion"))
            }
        }
    }

    /// Whether an outcome is ready to be collected
    pub fn is_finished(&self) -> bool {
        !self.outcome.is_empty()
    }
}

/// Worker-thread pool
///
/// Tasks are dequeued in FIFO order by whichever worker is free, so tasks
/// submitted from one thread start in submission order. [`join`](Self::join)
/// drains everything accepted so far and closes the pool for good.
///
/// # Example
///
/// ```
/// use pipe_logger::concurrency::Pool;
///
/// let pool = Pool::new(4).unwrap();
/// let handle = pool.add_task(|| 6 * 7).unwrap();
/// assert_eq!(handle.wait().unwrap(), 42);
/// pool.join().unwrap();
/// assert!(pool.add_task(|| ()).is_err());
/// ```
pub struct Pool {
    sender: RwLock<Option<Sender<Job>>>,
    receiver: Receiver<Job>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    worker_count: usize,
    queue_bound: Option<usize>,
}

impl Pool {
    /// Pool with an unbounded queue
    pub fn new(workers: usize) -> Result<Self> {
        Self::with_queue_bound(workers, None)
    }

    /// Pool whose queue holds at most `bound` waiting tasks
    pub fn with_queue_bound(workers: usize, bound: Option<usize>) -> Result<Self> {
        if workers == 0 {
            return Err(LoggerError::config("Pool", "worker count must be at least 1"));
        }
        if bound == Some(0) {
            return Err(LoggerError::config("Pool", "queue bound must be at least 1"));
        }

        let (sender, receiver) = match bound {
            Some(cap) => bounded::<Job>(cap),
            None => unbounded::<Job>(),
        };

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let jobs = receiver.clone();
            let spawned = thread::Builder::new()
                .name(format!("pool-worker-{}", idx))
                .spawn(move || {
                    // Ends once every sender is gone and the queue is drained
                    while let Ok(job) = jobs.recv() {
                        job();
                    }
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Let the workers already started exit before failing
                    drop(sender);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(LoggerError::config(
                        "Pool",
                        format!("failed to spawn worker {}: {}", idx, e),
                    ));
                }
            }
        }

        Ok(Self {
            sender: RwLock::new(Some(sender)),
            receiver,
            workers: Mutex::new(handles),
            worker_count: workers,
            queue_bound: bound,
        })
    }

    /// Queue a unit of work, blocking while a bounded queue is full
    pub fn add_task<F, R>(&self, task: F) -> Result<TaskHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.spawn_with(task, SubmitMode::Block)
    }

    /// Queue a unit of work, failing with `QueueFull` instead of blocking
    pub fn try_add_task<F, R>(&self, task: F) -> Result<TaskHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.spawn_with(task, SubmitMode::Try)
    }

    pub(crate) fn spawn_with<F, R>(&self, task: F, mode: SubmitMode) -> Result<TaskHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let job: Job = Box::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(task))
                .map_err(|payload| panic_message(payload.as_ref()));
            // Receiver may be gone if the caller dropped the handle
            let _ = tx.send(outcome);
        });
        self.submit(job, mode)?;
        Ok(TaskHandle { outcome: rx })
    }

    /// Queue a job whose outcome nobody collects
    pub(crate) fn submit(&self, job: Job, mode: SubmitMode) -> Result<()> {
        let guard = self.sender.read();
        let sender = guard.as_ref().ok_or(LoggerError::PoolClosed)?;

        match mode {
            SubmitMode::Block => sender.send(job).map_err(|_| LoggerError::PoolClosed),
            SubmitMode::Timeout(timeout) => match sender.send_timeout(job, timeout) {
                Ok(()) => Ok(()),
                Err(SendTimeoutError::Timeout(_)) => Err(self.queue_full()),
                Err(SendTimeoutError::Disconnected(_)) => Err(LoggerError::PoolClosed),
            },
            SubmitMode::Try => match sender.try_send(job) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => Err(self.queue_full()),
                Err(TrySendError::Disconnected(_)) => Err(LoggerError::PoolClosed),
            },
        }
    }

    fn queue_full(&self) -> LoggerError {
        LoggerError::queue_full(self.queue_bound.unwrap_or(usize::MAX))
    }

    /// Drain all accepted work, stop accepting more, and join the workers
    ///
    /// Calling it again is a no-op. Must not be called from inside a task of
    /// this pool.
    pub fn join(&self) -> Result<()> {
        // Closing the queue lets workers exit once it is drained
        drop(self.sender.write().take());

        let handles = std::mem::take(&mut *self.workers.lock());
        let mut failed = 0usize;
        for handle in handles {
            if handle.join().is_err() {
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(LoggerError::task_failed(format!(
                "{} pool worker(s) terminated abnormally",
                failed
            )));
        }
        Ok(())
    }

    pub fn workers(&self) -> usize {
        self.worker_count
    }

    pub fn queue_bound(&self) -> Option<usize> {
        self.queue_bound
    }

    /// Tasks queued but not yet picked up by a worker
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        if let Err(e) = self.join() {
            eprintln!("[LOGGER ERROR] Pool shutdown failed: {}", e);
        }
    }
}
