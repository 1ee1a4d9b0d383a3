//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

// Thread-local cache for the thread label; records share it by refcount
thread_local! {
    static THREAD_LABEL_CACHE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
}

/// Get cached thread label (name if set, id otherwise), computing it on first access
fn current_thread_label() -> Arc<str> {
    THREAD_LABEL_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let thread = std::thread::current();
                match thread.name() {
                    Some(name) => Arc::from(name),
                    None => Arc::from(format!("{:?}", thread.id())),
                }
            })
            .clone()
    })
}

/// Call-site descriptor attached to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Enclosing function or module path, when known
    pub function: Option<&'static str>,
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self {
            function: None,
            file,
            line,
            column: 0,
        }
    }

    #[must_use]
    pub const fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }

    /// Location of the caller, following `#[track_caller]` frames
    #[track_caller]
    pub fn caller() -> Self {
        let loc = std::panic::Location::caller();
        Self {
            function: None,
            file: loc.file(),
            line: loc.line(),
            column: loc.column(),
        }
    }

    /// The scope shown in rendered output: function when known, file otherwise
    pub fn scope(&self) -> &'static str {
        self.function.unwrap_or(self.file)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope(), self.line)
    }
}

/// One log event. Built once and then only read.
#[derive(Debug, Clone)]
pub struct LogRecord {
    level: LogLevel,
    message: String,
    timestamp: DateTime<Utc>,
    instant: Instant,
    location: Option<Location>,
    thread: Arc<str>,
}

impl LogRecord {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a record always renders to a single line.
    fn sanitize_message(message: String) -> String {
        if !message.contains(['\n', '\r', '\t']) {
            return message;
        }
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message.into()),
            timestamp: Utc::now(),
            instant: Instant::now(),
            location,
            thread: current_thread_label(),
        }
    }

    /// Replace the wall-clock timestamp, mostly useful for deterministic rendering
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    /// Monotonic capture time, for measuring queueing delay
    pub fn instant(&self) -> Instant {
        self.instant
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Name of the producing thread, or its id when unnamed
    pub fn thread(&self) -> &str {
        &self.thread
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_captures_fields() {
        let location = Location::new("src/main.rs", 42).with_function("app::run");
        let record = LogRecord::new(LogLevel::Error, "disk full", Some(location));

        assert_eq!(record.level(), LogLevel::Error);
        assert_eq!(record.message(), "disk full");
        assert_eq!(record.location(), Some(&location));
        assert!(record.instant() <= Instant::now());
    }

    #[test]
    fn test_message_sanitized() {
        let record = LogRecord::new(LogLevel::Info, "a\nb\rc\td", None);
        assert_eq!(record.message(), "a\\nb\\rc\\td");
    }

    #[test]
    fn test_location_caller() {
        let location = Location::caller();
        assert_eq!(location.file, file!());
        assert_eq!(location.line, line!() - 2);
        assert_eq!(location.scope(), file!());
        assert_eq!(location.with_function("m::f").to_string(), format!("m::f:{}", location.line));
    }

    #[test]
    fn test_thread_label_uses_name() {
        let label = std::thread::Builder::new()
            .name("worker-7".into())
            .spawn(|| LogRecord::new(LogLevel::Info, "x", None).thread().to_string())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(label, "worker-7");
    }

    #[test]
    fn test_records_share_thread_label() {
        let first = LogRecord::new(LogLevel::Info, "a", None);
        let second = LogRecord::new(LogLevel::Info, "b", None);
        assert!(Arc::ptr_eq(&first.thread, &second.thread));
    }
}
