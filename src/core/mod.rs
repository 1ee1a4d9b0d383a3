//! Core logger types and traits

pub mod async_logger;
pub mod config;
pub mod emitter;
pub mod error;
pub mod formatter;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod pipe;
pub mod strategy;
pub mod sync_logger;
pub mod timestamp;

pub use async_logger::AsyncLogger;
pub use config::{LoggerConfig, StrategyConfig};
pub use emitter::Emitter;
pub use error::{LoggerError, Result};
#[cfg(feature = "console")]
pub use formatter::ColoredFormatter;
pub use formatter::{DefaultFormatter, Formatter, ParsedLine};
pub use log_level::LogLevel;
pub use log_record::{Location, LogRecord};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{AsyncErrorPolicy, ErrorCallback, OverflowPolicy};
pub use pipe::{Pipe, Pipeline};
pub use strategy::LogStrategy;
pub use sync_logger::SyncLogger;
pub use timestamp::TimestampFormat;
