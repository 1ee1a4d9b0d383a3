//! Retry wrapper for emitters whose sink fails transiently

use crate::core::{Emitter, Result};
use std::thread;
use std::time::Duration;

/// Retries failed writes on the wrapped emitter
///
/// A write is attempted at most `1 + retries` times with `backoff` between
/// attempts; the last error is returned if every attempt fails. Only sink
/// failures are retried. The retries happen on whichever thread is emitting,
/// so under a [`SyncLogger`](crate::core::SyncLogger) the caller waits for
/// them.
pub struct RetryingEmitter<E> {
    inner: E,
    retries: u32,
    backoff: Duration,
    retried: u64,
}

impl<E: Emitter> RetryingEmitter<E> {
    pub fn new(inner: E, retries: u32) -> Self {
        Self {
            inner,
            retries,
            backoff: Duration::ZERO,
            retried: 0,
        }
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total number of retry attempts made so far
    pub fn retried(&self) -> u64 {
        self.retried
    }

    pub fn get_ref(&self) -> &E {
        &self.inner
    }
}

impl<E: Emitter> Emitter for RetryingEmitter<E> {
    fn write(&mut self, rendered: &str) -> Result<()> {
        let mut attempt = 0;
        loop {
            match self.inner.write(rendered) {
                Ok(()) => return Ok(()),
                Err(e) if e.is_write_failure() && attempt < self.retries => {
                    attempt += 1;
                    self.retried += 1;
                    if !self.backoff.is_zero() {
                        thread::sleep(self.backoff);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
