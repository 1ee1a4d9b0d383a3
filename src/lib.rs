//! # Pipe Logger
//!
//! A composable logging core: a record is rendered by a [`Formatter`] and
//! written by an [`Emitter`], the pair forming a [`Pipe`]. A strategy decides
//! who runs the pipe:
//!
//! - [`SyncLogger`]: the calling thread, under a lock. Records appear in the
//!   sink in lock order and emitter failures reach the caller.
//! - [`AsyncLogger`]: a [`Pool`](concurrency::Pool) of workers. Records from
//!   one thread appear in the order they were logged, the sink only ever
//!   sees one writer, and every accepted record is emitted before shutdown
//!   returns.
//!
//! [`Logger`] is the front-end applications hold; the level macros
//! (`trace!` through `fatal!`) attach the call site to each record.
//!
//! The `concurrency` module also exposes the building blocks the async
//! strategy is made of: a single-slot [`Channel`](concurrency::Channel), a
//! counting/broadcast [`Signal`](concurrency::Signal) and the worker pool.
//!
//! ## Features
//!
//! - `console` (default): colored level tags via [`ColoredFormatter`]
//! - `file` (default): [`FileEmitter`](emitters::FileEmitter) with optional
//!   advisory locking

pub mod concurrency;
pub mod core;
pub mod emitters;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "file")]
    pub use crate::emitters::FileEmitter;
    pub use crate::emitters::{
        ConsoleEmitter, FlushPolicy, MemoryEmitter, MemorySink, RetryingEmitter, StreamEmitter,
    };
    pub use crate::core::{
        AsyncErrorPolicy, AsyncLogger, DefaultFormatter, Emitter, Formatter, Location, LogLevel,
        LogRecord, LogStrategy, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        OverflowPolicy, Pipe, Pipeline, Result, StrategyConfig, SyncLogger, TimestampFormat,
    };
}

#[cfg(feature = "console")]
pub use crate::core::ColoredFormatter;
pub use crate::core::{
    AsyncErrorPolicy, AsyncLogger, DefaultFormatter, Emitter, ErrorCallback, Formatter, Location,
    LogLevel, LogRecord, LogStrategy, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, OverflowPolicy, ParsedLine, Pipe, Pipeline, Result, StrategyConfig, SyncLogger,
    TimestampFormat,
};
pub use emitters::{ConsoleEmitter, MemoryEmitter, StreamEmitter};
