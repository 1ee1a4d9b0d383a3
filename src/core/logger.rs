//! Logger front-end and builder

use super::{
    async_logger::AsyncLogger,
    config::{LoggerConfig, StrategyConfig},
    emitter::Emitter,
    error::{LoggerError, Result},
    formatter::{DefaultFormatter, Formatter},
    log_level::LogLevel,
    log_record::Location,
    metrics::LoggerMetrics,
    overflow_policy::{AsyncErrorPolicy, OverflowPolicy},
    pipe::{Pipe, Pipeline},
    strategy::LogStrategy,
    sync_logger::SyncLogger,
    timestamp::TimestampFormat,
};
use std::sync::Arc;

/// The logging API applications hold on to
///
/// Wraps one [`LogStrategy`] chosen at construction. The level methods
/// attach the caller's file and line to every record; the level macros
/// (`info!` and friends) additionally attach the module path.
///
/// # Example
///
/// ```
/// use pipe_logger::prelude::*;
///
/// let (emitter, sink) = MemoryEmitter::new();
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .emitter(emitter)
///     .build()
///     .unwrap();
///
/// logger.info("Server started").unwrap();
/// logger.trace("filtered out").unwrap();
/// assert_eq!(sink.len(), 1);
/// ```
pub struct Logger {
    strategy: Box<dyn LogStrategy>,
}

impl Logger {
    /// Wrap an already-built strategy
    pub fn new<S: LogStrategy + 'static>(strategy: S) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    /// Synchronous logger over `pipe` accepting every level
    pub fn sync<P: Pipeline + 'static>(pipe: P) -> Self {
        Self::new(SyncLogger::new(pipe))
    }

    /// Log with the caller's location attached
    #[track_caller]
    #[inline]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        let location = Location::caller();
        self.log_at(level, message, Some(location))
    }

    /// Log with an explicit location, or none
    pub fn log_at(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        location: Option<Location>,
    ) -> Result<()> {
        if !self.strategy.is_enabled(level) {
            return Ok(());
        }
        self.strategy.log(level, message.into(), location)
    }

    #[track_caller]
    #[inline]
    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[track_caller]
    #[inline]
    pub fn warning(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warning, message)
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    #[track_caller]
    #[inline]
    pub fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }

    pub fn min_level(&self) -> LogLevel {
        self.strategy.min_level()
    }

    /// Whether a record at `level` would be emitted; lets callers skip
    /// building expensive messages
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.strategy.is_enabled(level)
    }

    pub fn flush(&self) -> Result<()> {
        self.strategy.flush()
    }

    /// Emit everything accepted so far; async loggers refuse records afterwards
    pub fn shutdown(&self) -> Result<()> {
        self.strategy.shutdown()
    }

    /// Get logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use pipe_logger::prelude::*;
    ///
    /// let (emitter, _sink) = MemoryEmitter::new();
    /// let logger = Logger::builder().emitter(emitter).build().unwrap();
    /// logger.error("disk almost full").unwrap();
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.emitted_count(), 1);
    /// assert_eq!(metrics.failure_rate(), 0.0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        self.strategy.metrics()
    }

    /// `"sync"`, `"async"` or a custom strategy's name
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Only the emitter is mandatory. Without an explicit formatter a
/// [`DefaultFormatter`] is built from the timestamp format and location
/// settings.
///
/// # Example
/// ```
/// use pipe_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .emitter(StreamEmitter::new(std::io::sink()))
///     .async_mode(2, Some(1024))
///     .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)))
///     .on_error(|err| eprintln!("ALERT: {}", err))
///     .build()
///     .unwrap();
/// assert_eq!(logger.strategy_name(), "async");
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    strategy: StrategyConfig,
    overflow_policy: OverflowPolicy,
    error_policy: AsyncErrorPolicy,
    timestamp_format: TimestampFormat,
    include_location: bool,
    formatter: Option<Box<dyn Formatter>>,
    emitter: Option<Box<dyn Emitter>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::from_config(&LoggerConfig::default())
    }

    /// Start from plain-data options, e.g. deserialized from a file
    pub fn from_config(config: &LoggerConfig) -> Self {
        Self {
            min_level: config.min_level,
            strategy: config.strategy,
            overflow_policy: config.overflow_policy,
            error_policy: AsyncErrorPolicy::default(),
            timestamp_format: config.timestamp_format.clone(),
            include_location: config.include_location,
            formatter: None,
            emitter: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Replace the default text formatter
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Set the sink; required
    #[must_use = "builder methods return a new value"]
    pub fn emitter<E: Emitter + 'static>(mut self, emitter: E) -> Self {
        self.emitter = Some(Box::new(emitter));
        self
    }

    /// Timestamp format of the default formatter
    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Whether the default formatter renders the `[scope:line]` slot
    #[must_use = "builder methods return a new value"]
    pub fn include_location(mut self, include: bool) -> Self {
        self.include_location = include;
        self
    }

    /// Emit on the calling thread (the default)
    #[must_use = "builder methods return a new value"]
    pub fn sync(mut self) -> Self {
        self.strategy = StrategyConfig::Sync;
        self
    }

    /// Emit from a pool of `workers` threads
    ///
    /// `queue_bound` limits how many records may wait for a worker; `None`
    /// leaves the queue unbounded.
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, workers: usize, queue_bound: Option<usize>) -> Self {
        self.strategy = StrategyConfig::Async {
            workers,
            queue_bound,
        };
        self
    }

    /// Set the overflow policy for async logging
    ///
    /// Ignored by the synchronous strategy.
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Set where async failures are reported
    #[must_use = "builder methods return a new value"]
    pub fn error_policy(mut self, policy: AsyncErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Report async failures to `callback`
    #[must_use = "builder methods return a new value"]
    pub fn on_error<C>(self, callback: C) -> Self
    where
        C: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.error_policy(AsyncErrorPolicy::Callback(Arc::new(callback)))
    }

    /// Build the Logger
    ///
    /// Fails with `InvalidConfiguration` when no emitter was set or the
    /// async settings are out of range.
    pub fn build(self) -> Result<Logger> {
        self.strategy.validate()?;
        let emitter = self
            .emitter
            .ok_or_else(|| LoggerError::config("LoggerBuilder", "an emitter is required"))?;
        let formatter: Box<dyn Formatter> = match self.formatter {
            Some(formatter) => formatter,
            None => Box::new(
                DefaultFormatter::new()
                    .with_timestamp_format(self.timestamp_format)
                    .with_include_location(self.include_location),
            ),
        };
        let pipe: Pipe<Box<dyn Formatter>, Box<dyn Emitter>> = Pipe::new(formatter, emitter);

        let logger = match self.strategy {
            StrategyConfig::Sync => {
                Logger::new(SyncLogger::new(pipe).with_min_level(self.min_level))
            }
            StrategyConfig::Async {
                workers,
                queue_bound,
            } => Logger::new(
                AsyncLogger::new(pipe, workers, queue_bound)?
                    .with_min_level(self.min_level)
                    .with_overflow_policy(self.overflow_policy)
                    .with_error_policy(self.error_policy),
            ),
        };
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::MemoryEmitter;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_builder_requires_emitter() {
        let err = Logger::builder().build().err().expect("missing emitter");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_builder_rejects_zero_workers() {
        let (emitter, _sink) = MemoryEmitter::new();
        let result = Logger::builder().emitter(emitter).async_mode(0, None).build();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { ref component, .. }) if component == "StrategyConfig"
        ));
    }

    #[test]
    fn test_builder_validates_config_before_emitter_check() {
        let config = LoggerConfig {
            strategy: StrategyConfig::Async {
                workers: 2,
                queue_bound: Some(0),
            },
            ..LoggerConfig::default()
        };
        let err = LoggerBuilder::from_config(&config)
            .build()
            .err()
            .expect("zero bound rejected");
        assert!(matches!(
            err,
            LoggerError::InvalidConfiguration { ref component, .. } if component == "StrategyConfig"
        ));
    }

    #[test]
    fn test_level_methods_capture_call_site() {
        let (emitter, sink) = MemoryEmitter::new();
        let logger = Logger::builder()
            .min_level(LogLevel::Trace)
            .emitter(emitter)
            .build()
            .unwrap();

        let line = line!() + 1;
        logger.warning("careful").unwrap();

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        let parsed = DefaultFormatter::new().parse_line(&lines[0]).unwrap();
        assert_eq!(parsed.level, LogLevel::Warning);
        assert_eq!(parsed.scope.as_deref(), Some(file!()));
        assert_eq!(parsed.line, Some(line));
        assert_eq!(parsed.message, "careful");
    }

    #[test]
    fn test_min_level_filters() {
        let (emitter, sink) = MemoryEmitter::new();
        let logger = Logger::builder()
            .min_level(LogLevel::Warning)
            .emitter(emitter)
            .build()
            .unwrap();

        assert!(!logger.is_enabled(LogLevel::Info));
        assert!(logger.is_enabled(LogLevel::Fatal));
        logger.debug("no").unwrap();
        logger.error("yes").unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(logger.min_level(), LogLevel::Warning);
    }

    #[test]
    fn test_sync_surfaces_write_errors() {
        let (emitter, sink) = MemoryEmitter::new();
        let logger = Logger::builder().emitter(emitter).build().unwrap();

        sink.fail_writes(true);
        assert!(logger.info("lost").unwrap_err().is_write_failure());
        assert_eq!(logger.metrics().failed_count(), 1);
    }

    #[test]
    fn test_async_builder_with_callback() {
        let failures = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&failures);
        let (emitter, sink) = MemoryEmitter::new();
        let logger = Logger::builder()
            .emitter(emitter)
            .async_mode(2, Some(8))
            .on_error(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();
        assert_eq!(logger.strategy_name(), "async");

        sink.fail_writes(true);
        logger.info("first").unwrap();
        logger.info("second").unwrap();
        logger.shutdown().unwrap();

        assert_eq!(failures.load(Ordering::SeqCst), 2);
        assert!(sink.is_empty());
        assert!(matches!(logger.info("late"), Err(LoggerError::LoggerStopped)));
        assert_eq!(logger.metrics().rejected_count(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = LoggerConfig {
            min_level: LogLevel::Error,
            include_location: false,
            timestamp_format: TimestampFormat::Unix,
            ..LoggerConfig::default()
        };
        let (emitter, sink) = MemoryEmitter::new();
        let logger = LoggerBuilder::from_config(&config)
            .emitter(emitter)
            .build()
            .unwrap();

        logger.warning("skipped").unwrap();
        logger.error("kept").unwrap();

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[ERROR]["));
        assert!(lines[0].ends_with("] kept"));
        assert_eq!(logger.strategy_name(), "sync");
    }
}
