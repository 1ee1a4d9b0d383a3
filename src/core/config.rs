//! Plain-data logger configuration
//!
//! [`LoggerConfig`] carries everything about a logger that can live in a
//! configuration file. Formatters, emitters and callbacks are code, so they
//! are supplied to the [`LoggerBuilder`](super::LoggerBuilder) directly;
//! reading and parsing the file is left to the host application.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::overflow_policy::OverflowPolicy;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Which delivery strategy to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyConfig {
    /// The calling thread emits its own record
    #[default]
    Sync,

    /// A worker pool emits records
    Async {
        workers: usize,
        /// `None` for an unbounded queue
        #[serde(default)]
        queue_bound: Option<usize>,
    },
}

/// Serializable logger options
///
/// # Example
///
/// ```
/// use pipe_logger::core::{LogLevel, LoggerConfig, StrategyConfig};
///
/// let config = LoggerConfig {
///     min_level: LogLevel::Debug,
///     strategy: StrategyConfig::Async { workers: 2, queue_bound: Some(1024) },
///     ..LoggerConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub strategy: StrategyConfig,
    pub overflow_policy: OverflowPolicy,
    pub timestamp_format: TimestampFormat,
    pub include_location: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            strategy: StrategyConfig::Sync,
            overflow_policy: OverflowPolicy::Block,
            timestamp_format: TimestampFormat::Iso8601,
            include_location: true,
        }
    }
}

impl StrategyConfig {
    /// Reject worker counts and queue bounds no pool can be built from
    pub fn validate(&self) -> Result<()> {
        if let StrategyConfig::Async {
            workers,
            queue_bound,
        } = *self
        {
            if workers == 0 {
                return Err(LoggerError::config(
                    "StrategyConfig",
                    "async strategy needs at least 1 worker",
                ));
            }
            if queue_bound == Some(0) {
                return Err(LoggerError::config(
                    "StrategyConfig",
                    "queue bound must be at least 1",
                ));
            }
        }
        Ok(())
    }
}

impl LoggerConfig {
    /// Check the values a logger cannot be built from
    ///
    /// [`LoggerBuilder::build`](super::LoggerBuilder::build) runs the same
    /// check, so calling this up front only reports the problem earlier.
    pub fn validate(&self) -> Result<()> {
        self.strategy.validate()
    }
}
