//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!` and attach the call
//! site (module path, file, line and column) to the record. Arguments are
//! not formatted at all when the level is filtered out.
//!
//! Every macro evaluates to the `Result<()>` returned by the logger.
//!
//! # Examples
//!
//! ```
//! use pipe_logger::prelude::*;
//! use pipe_logger::info;
//!
//! let (emitter, sink) = MemoryEmitter::new();
//! let logger = Logger::builder().emitter(emitter).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//! assert_eq!(sink.len(), 2);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use pipe_logger::prelude::*;
/// # let (emitter, _sink) = MemoryEmitter::new();
/// # let logger = Logger::builder().emitter(emitter).build().unwrap();
/// use pipe_logger::log;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let level = $level;
        if $logger.is_enabled(level) {
            $logger.log_at(
                level,
                format!($($arg)+),
                Some($crate::__call_site!()),
            )
        } else {
            Ok(())
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __call_site {
    () => {{
        let mut location = $crate::core::Location::new(file!(), line!()).with_function(module_path!());
        location.column = column!();
        location
    }};
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use pipe_logger::prelude::*;
/// # let (emitter, _sink) = MemoryEmitter::new();
/// # let logger = Logger::builder().min_level(LogLevel::Trace).emitter(emitter).build().unwrap();
/// use pipe_logger::trace;
/// trace!(logger, "Entering function: calculate()").unwrap();
/// trace!(logger, "Variable value: {}", 42).unwrap();
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use pipe_logger::prelude::*;
/// # let (emitter, _sink) = MemoryEmitter::new();
/// # let logger = Logger::builder().emitter(emitter).build().unwrap();
/// use pipe_logger::warning;
/// warning!(logger, "Low disk space").unwrap();
/// warning!(logger, "Retry attempt {} of {}", 3, 5).unwrap();
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
