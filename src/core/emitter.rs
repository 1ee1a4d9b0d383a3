//! Emitter trait for log output destinations

use super::error::Result;

/// Writes rendered records to a sink
///
/// Loggers call an emitter only while holding their own lock, so an
/// implementation sees at most one caller at a time and needs no internal
/// synchronization. Each `write` receives one rendered record without a
/// line terminator.
pub trait Emitter: Send {
    fn write(&mut self, rendered: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<E: Emitter + ?Sized> Emitter for Box<E> {
    fn write(&mut self, rendered: &str) -> Result<()> {
        (**self).write(rendered)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
