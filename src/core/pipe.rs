//! Formatter + emitter composition

use super::emitter::Emitter;
use super::error::Result;
use super::formatter::{DefaultFormatter, Formatter};
use super::log_record::LogRecord;

/// One processing stage: render a record, then hand it to the sink
///
/// Object-safe so strategies can be written against `Box<dyn Pipeline>` as
/// well as concrete pipes.
pub trait Pipeline: Send {
    fn process(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

impl<P: Pipeline + ?Sized> Pipeline for Box<P> {
    fn process(&mut self, record: &LogRecord) -> Result<()> {
        (**self).process(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Owns exactly one formatter and one emitter
///
/// No retries happen here; an emitter that wants them wraps itself, see
/// [`RetryingEmitter`](crate::emitters::RetryingEmitter).
pub struct Pipe<F, E> {
    formatter: F,
    emitter: E,
}

impl<F: Formatter, E: Emitter> Pipe<F, E> {
    pub fn new(formatter: F, emitter: E) -> Self {
        Self { formatter, emitter }
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Take the pipe apart, e.g. to recover an in-memory sink
    pub fn into_parts(self) -> (F, E) {
        (self.formatter, self.emitter)
    }
}

impl<E: Emitter> Pipe<DefaultFormatter, E> {
    /// Pipe with the default text formatter
    pub fn with_default_formatter(emitter: E) -> Self {
        Self::new(DefaultFormatter::default(), emitter)
    }
}

impl<F: Formatter, E: Emitter> Pipeline for Pipe<F, E> {
    #[inline]
    fn process(&mut self, record: &LogRecord) -> Result<()> {
        let rendered = self.formatter.render(record);
        self.emitter.write(&rendered)
    }

    fn flush(&mut self) -> Result<()> {
        self.emitter.flush()
    }
}
