//! Single-slot rendezvous channel and a value-less start signal

use crate::core::{LoggerError, Result};
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

struct Slot<T> {
    value: Option<T>,
    closed: bool,
}

/// Holds zero or one pending value
///
/// `send` stores a value and wakes one receiver. A second `send` waits until
/// the pending value has been taken, so nothing is overwritten. This is a
/// synchronization point, not a queue: concurrently blocked senders are
/// served in no particular order.
///
/// # Example
///
/// ```
/// use pipe_logger::concurrency::Channel;
/// use std::sync::Arc;
///
/// let channel = Arc::new(Channel::new());
/// let producer = Arc::clone(&channel);
/// std::thread::spawn(move || producer.send(42).unwrap());
///
/// assert_eq!(channel.recv().unwrap(), 42);
/// ```
pub struct Channel<T> {
    slot: Mutex<Slot<T>>,
    filled: Condvar,
    emptied: Condvar,
}

impl<T> Channel<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                value: None,
                closed: false,
            }),
            filled: Condvar::new(),
            emptied: Condvar::new(),
        }
    }

    /// Store `value`, waiting for the slot to empty if a value is pending
    pub fn send(&self, value: T) -> Result<()> {
        let mut slot = self.slot.lock();
        while slot.value.is_some() && !slot.closed {
            self.emptied.wait(&mut slot);
        }
        if slot.closed {
            return Err(LoggerError::ChannelClosed);
        }
        slot.value = Some(value);
        self.filled.notify_one();
        Ok(())
    }

    /// Block until a value is available and take it
    ///
    /// A value sent before [`close`](Self::close) can still be received;
    /// after that, `recv` fails with `ChannelClosed`.
    pub fn recv(&self) -> Result<T> {
        let mut slot = self.slot.lock();
        loop {
            if let Some(value) = slot.value.take() {
                self.emptied.notify_one();
                return Ok(value);
            }
            if slot.closed {
                return Err(LoggerError::ChannelClosed);
            }
            self.filled.wait(&mut slot);
        }
    }

    /// Like [`recv`](Self::recv) but gives up after `timeout`, returning `Ok(None)`
    ///
    /// A timeout too large to express as a deadline waits like `recv`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<T>> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return self.recv().map(Some),
        };
        let mut slot = self.slot.lock();
        loop {
            if let Some(value) = slot.value.take() {
                self.emptied.notify_one();
                return Ok(Some(value));
            }
            if slot.closed {
                return Err(LoggerError::ChannelClosed);
            }
            if self.filled.wait_until(&mut slot, deadline).timed_out() {
                return match slot.value.take() {
                    Some(value) => {
                        self.emptied.notify_one();
                        Ok(Some(value))
                    }
                    None => Ok(None),
                };
            }
        }
    }

    /// Take the pending value without blocking
    pub fn try_recv(&self) -> Result<Option<T>> {
        let mut slot = self.slot.lock();
        match slot.value.take() {
            Some(value) => {
                self.emptied.notify_one();
                Ok(Some(value))
            }
            None if slot.closed => Err(LoggerError::ChannelClosed),
            None => Ok(None),
        }
    }

    /// Close the channel and wake every blocked sender and receiver
    pub fn close(&self) {
        let mut slot = self.slot.lock();
        slot.closed = true;
        self.filled.notify_all();
        self.emptied.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct SignalState {
    permits: usize,
    open: bool,
    closed: bool,
}

/// Value-less channel used to release waiting threads
///
/// [`send`](Self::send) releases a counted number of waiters;
/// [`broadcast`](Self::broadcast) latches the signal open and releases every
/// current and future waiter, which is what a "start" gate for a group of
/// workers needs.
///
/// # Example
///
/// ```
/// use pipe_logger::concurrency::Signal;
/// use std::sync::Arc;
///
/// let start = Arc::new(Signal::new());
/// let workers: Vec<_> = (0..4)
///     .map(|_| {
///         let start = Arc::clone(&start);
///         std::thread::spawn(move || start.recv())
///     })
///     .collect();
///
/// start.broadcast();
/// for worker in workers {
///     assert!(worker.join().unwrap().is_ok());
/// }
/// ```
pub struct Signal {
    state: Mutex<SignalState>,
    cond: Condvar,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SignalState {
                permits: 0,
                open: false,
                closed: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Release up to `permits` waiters, now or when they arrive
    pub fn send(&self, permits: usize) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(LoggerError::ChannelClosed);
        }
        state.permits = state.permits.saturating_add(permits);
        if permits == 1 {
            self.cond.notify_one();
        } else if permits > 1 {
            self.cond.notify_all();
        }
        Ok(())
    }

    /// Latch the signal open: every waiter passes from now on
    pub fn broadcast(&self) {
        let mut state = self.state.lock();
        state.open = true;
        self.cond.notify_all();
    }

    /// Block until released
    pub fn recv(&self) -> Result<()> {
        let mut state = self.state.lock();
        loop {
            if let Some(done) = Self::try_pass(&mut state) {
                return done;
            }
            self.cond.wait(&mut state);
        }
    }

    /// Block until released or `timeout` elapses; `Ok(false)` on timeout
    pub fn recv_timeout(&self, timeout: Duration) -> Result<bool> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return self.recv().map(|()| true),
        };
        let mut state = self.state.lock();
        loop {
            if let Some(done) = Self::try_pass(&mut state) {
                return done.map(|()| true);
            }
            if self.cond.wait_until(&mut state, deadline).timed_out() {
                return Self::try_pass(&mut state)
                    .map(|done| done.map(|()| true))
                    .unwrap_or(Ok(false));
            }
        }
    }

    /// Fail every current and future waiter with `ChannelClosed`
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.cond.notify_all();
    }

    fn try_pass(state: &mut SignalState) -> Option<Result<()>> {
        if state.open {
            return Some(Ok(()));
        }
        if state.permits > 0 {
            state.permits -= 1;
            return Some(Ok(()));
        }
        if state.closed {
            return Some(Err(LoggerError::ChannelClosed));
        }
        None
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}
