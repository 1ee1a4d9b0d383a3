//! Policies for the asynchronous logger's failure paths
//!
//! [`OverflowPolicy`] decides what `log` does when the worker queue is full.
//! [`AsyncErrorPolicy`] decides where failures go once the caller has
//! already returned. Neither path is ever silent: every lost record is
//! counted in [`LoggerMetrics`](super::LoggerMetrics).

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling a full queue in async logging
///
/// # Example
///
/// ```
/// use pipe_logger::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: apply backpressure
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::Block);
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Block the producer until space is available
    ///
    /// No record is lost; the caller absorbs the backpressure.
    #[default]
    Block,

    /// Block with timeout, then drop
    BlockWithTimeout(Duration),

    /// Drop the new record immediately
    ///
    /// For high-throughput scenarios where some loss is acceptable.
    DropNewest,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
        }
    }
}

/// Callback type for async failure notifications
///
/// Called on a worker thread (write failures) or on the producer thread
/// (dropped records), never while a logger lock is held, so the callback
/// may log through the same logger.
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Where async failures are reported
#[derive(Clone, Default)]
pub enum AsyncErrorPolicy {
    /// Print to stderr on the first failure and every 1000th after it
    #[default]
    Stderr,

    /// Only count the failure in the metrics
    DropAndCount,

    /// Hand every failure to a user callback
    Callback(ErrorCallback),
}

impl AsyncErrorPolicy {
    /// Whether failures stay out of stderr entirely, shutdown summary included
    pub(crate) fn is_silent(&self) -> bool {
        matches!(self, AsyncErrorPolicy::DropAndCount)
    }

    /// Report one failure; `occurrence` is the zero-based count of failures so far
    pub(crate) fn report(&self, error: &LoggerError, occurrence: u64) {
        match self {
            AsyncErrorPolicy::Stderr => {
                if occurrence == 0 || (occurrence + 1) % 1000 == 0 {
                    eprintln!(
                        "[LOGGER ERROR] Async logging failure #{}: {}",
                        occurrence + 1,
                        error
                    );
                }
            }
            AsyncErrorPolicy::DropAndCount => {}
            AsyncErrorPolicy::Callback(callback) => callback(error),
        }
    }
}

impl fmt::Debug for AsyncErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsyncErrorPolicy::Stderr => write!(f, "Stderr"),
            AsyncErrorPolicy::DropAndCount => write!(f, "DropAndCount"),
            AsyncErrorPolicy::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}
