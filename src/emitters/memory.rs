//! In-memory emitter, handy for tests and for capturing output

use crate::core::{Emitter, LoggerError, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared view of the lines a [`MemoryEmitter`] has received
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl MemorySink {
    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    /// Make subsequent writes fail as if the sink were full
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

/// Stores each rendered record as one line in memory
pub struct MemoryEmitter {
    sink: MemorySink,
}

impl MemoryEmitter {
    /// Create the emitter together with a handle for reading what it received
    pub fn new() -> (Self, MemorySink) {
        let sink = MemorySink::default();
        (Self { sink: sink.clone() }, sink)
    }
}

impl Emitter for MemoryEmitter {
    fn write(&mut self, rendered: &str) -> Result<()> {
        if self.sink.failing.load(Ordering::SeqCst) {
            return Err(LoggerError::emitter_write(
                "memory",
                std::io::Error::new(std::io::ErrorKind::StorageFull, "memory sink rejected write"),
            ));
        }
        self.sink.lines.lock().push(rendered.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
