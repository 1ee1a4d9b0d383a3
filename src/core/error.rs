//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Sink write or flush failed
    #[error("Emitter '{emitter}' failed to write: {source}")]
    EmitterWrite {
        emitter: String,
        #[source]
        source: std::io::Error,
    },

    /// Receive or send on a closed channel
    #[error("Channel closed")]
    ChannelClosed,

    /// A pool task panicked
    #[error("Task failed: {message}")]
    TaskFailed { message: String },

    /// Task submitted after the pool was joined
    #[error("Pool is closed to new tasks")]
    PoolClosed,

    /// Logger already stopped
    #[error("Logger already stopped")]
    LoggerStopped,

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },

    /// Async queue full and the record was dropped
    #[error("Log queue full: {capacity} tasks buffered")]
    QueueFull { capacity: usize },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an emitter write error
    pub fn emitter_write(emitter: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::EmitterWrite {
            emitter: emitter.into(),
            source,
        }
    }

    /// Create a task failure error from a panic payload
    pub fn task_failed(message: impl Into<String>) -> Self {
        LoggerError::TaskFailed {
            message: message.into(),
        }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }

    /// Create a queue full error
    pub fn queue_full(capacity: usize) -> Self {
        LoggerError::QueueFull { capacity }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error came from the sink
    pub fn is_write_failure(&self) -> bool {
        matches!(self, LoggerError::EmitterWrite { .. } | LoggerError::IoError(_))
    }
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
