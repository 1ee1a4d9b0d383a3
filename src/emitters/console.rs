//! Console emitter implementation

use crate::core::{Emitter, LoggerError, Result};
use std::io::Write;

/// Which standard stream a [`ConsoleEmitter`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Writes records to stdout or stderr
///
/// Pair with [`ColoredFormatter`](crate::core::ColoredFormatter) for colored
/// level tags.
#[derive(Debug, Default)]
pub struct ConsoleEmitter {
    target: ConsoleTarget,
}

impl ConsoleEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
        }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Emitter for ConsoleEmitter {
    fn write(&mut self, rendered: &str) -> Result<()> {
        let result = match self.target {
            ConsoleTarget::Stdout => writeln!(std::io::stdout().lock(), "{}", rendered),
            ConsoleTarget::Stderr => writeln!(std::io::stderr().lock(), "{}", rendered),
        };
        result.map_err(|e| LoggerError::emitter_write("console", e))
    }

    fn flush(&mut self) -> Result<()> {
        let result = match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush(),
            ConsoleTarget::Stderr => std::io::stderr().flush(),
        };
        result.map_err(|e| LoggerError::emitter_write("console", e))
    }

    fn name(&self) -> &str {
        "console"
    }
}
