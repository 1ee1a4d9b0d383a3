//! File emitter implementation

use crate::core::{Emitter, LoggerError, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Writes records to an already-open file
///
/// With [`with_advisory_lock`](Self::with_advisory_lock) every write takes an
/// exclusive advisory lock on the file and flushes before releasing it, so
/// several processes appending to one physical file never interleave within
/// a line.
///
/// ```no_run
/// use pipe_logger::emitters::FileEmitter;
/// use std::fs::OpenOptions;
///
/// let file = OpenOptions::new().create(true).append(true).open("/var/log/app.log").unwrap();
/// let emitter = FileEmitter::new(file).with_advisory_lock(true);
/// ```
pub struct FileEmitter {
    writer: BufWriter<File>,
    advisory_lock: bool,
}

impl FileEmitter {
    pub fn new(file: File) -> Self {
        Self {
            writer: BufWriter::new(file),
            advisory_lock: false,
        }
    }

    #[must_use]
    pub fn with_advisory_lock(mut self, enabled: bool) -> Self {
        self.advisory_lock = enabled;
        self
    }

    fn write_locked(&mut self, rendered: &str) -> std::io::Result<()> {
        self.writer.get_ref().lock_exclusive()?;
        let result = self
            .writer
            .write_all(rendered.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());
        let unlocked = self.writer.get_ref().unlock();
        result.and(unlocked)
    }
}

impl Emitter for FileEmitter {
    fn write(&mut self, rendered: &str) -> Result<()> {
        let result = if self.advisory_lock {
            self.write_locked(rendered)
        } else {
            self.writer
                .write_all(rendered.as_bytes())
                .and_then(|_| self.writer.write_all(b"\n"))
        };
        result.map_err(|e| LoggerError::emitter_write("file", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LoggerError::emitter_write("file", e))
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileEmitter {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.flush();
    }
}
