//! The capability every delivery strategy provides to the front-end

use super::error::Result;
use super::log_level::LogLevel;
use super::log_record::Location;
use super::metrics::LoggerMetrics;

/// Sync-or-async delivery behind a uniform interface
///
/// [`Logger`](super::Logger) holds one of these as a trait object, so custom
/// strategies plug in the same way [`SyncLogger`](super::SyncLogger) and
/// [`AsyncLogger`](super::AsyncLogger) do.
pub trait LogStrategy: Send + Sync {
    /// Filter, build a record and deliver it
    fn log(&self, level: LogLevel, message: String, location: Option<Location>) -> Result<()>;

    /// Records below this level are discarded before a record is built
    fn min_level(&self) -> LogLevel;

    fn flush(&self) -> Result<()>;

    /// Deliver everything accepted so far and stop accepting records
    fn shutdown(&self) -> Result<()>;

    fn metrics(&self) -> &LoggerMetrics;

    fn name(&self) -> &str;

    #[inline]
    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }
}
