//! Formatter trait and the default text rendering
//!
//! The default layout is:
//!
//! ```text
//! [WARN ][2025-01-08T10:30:45.123Z][app::server:42] Request processed
//! ```
//!
//! Records without a call site render `[-]` in the location slot.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use std::fmt::Write;

/// Renders a record into its textual representation
///
/// Implementations must be pure: configuration is fixed at construction and
/// `render` may be called from many threads at once.
pub trait Formatter: Send + Sync {
    fn render(&self, record: &LogRecord) -> String;

    fn name(&self) -> &str {
        "formatter"
    }
}

impl<F: Formatter + ?Sized> Formatter for Box<F> {
    fn render(&self, record: &LogRecord) -> String {
        (**self).render(record)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Default `[LEVEL][timestamp][scope:line] message` formatter
#[derive(Debug, Clone)]
pub struct DefaultFormatter {
    timestamp_format: TimestampFormat,
    include_location: bool,
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::default(),
            include_location: true,
        }
    }
}

impl DefaultFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timestamp format
    ///
    /// # Examples
    ///
    /// ```
    /// use pipe_logger::core::{DefaultFormatter, TimestampFormat};
    ///
    /// let formatter = DefaultFormatter::new()
    ///     .with_timestamp_format(TimestampFormat::Iso8601Micros);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    /// Set whether the `[scope:line]` slot is rendered
    #[must_use]
    pub fn with_include_location(mut self, include: bool) -> Self {
        self.include_location = include;
        self
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    /// Render using an already-formatted level tag
    fn render_with_tag(&self, tag: &str, record: &LogRecord) -> String {
        let message = record.message();
        let mut out = String::with_capacity(48 + message.len());

        // Writing into a String cannot fail
        let _ = write!(
            out,
            "[{}][{}]",
            tag,
            self.timestamp_format.format(record.timestamp())
        );
        if self.include_location {
            match record.location() {
                Some(location) => {
                    let _ = write!(out, "[{}:{}]", location.scope(), location.line);
                }
                None => out.push_str("[-]"),
            }
        }
        out.push(' ');
        out.push_str(message);
        out
    }

    /// Parse a line produced by this formatter
    ///
    /// # Examples
    ///
    /// ```
    /// use pipe_logger::core::{DefaultFormatter, Formatter, Location, LogLevel, LogRecord};
    ///
    /// let formatter = DefaultFormatter::new();
    /// let location = Location::new("src/main.rs", 7).with_function("app::main");
    /// let line = formatter.render(&LogRecord::new(LogLevel::Warning, "hi", Some(location)));
    ///
    /// let parsed = formatter.parse_line(&line).unwrap();
    /// assert_eq!(parsed.level, LogLevel::Warning);
    /// assert_eq!(parsed.scope.as_deref(), Some("app::main"));
    /// assert_eq!(parsed.line, Some(7));
    /// assert_eq!(parsed.message, "hi");
    /// ```
    pub fn parse_line(&self, line: &str) -> Result<ParsedLine> {
        let (level_text, rest) = take_bracketed(line)
            .ok_or_else(|| LoggerError::formatter("text", "missing level tag"))?;
        let level = level_text
            .parse::<LogLevel>()
            .map_err(|e| LoggerError::formatter("text", e))?;

        let (timestamp, mut rest) = take_bracketed(rest)
            .ok_or_else(|| LoggerError::formatter("text", "missing timestamp"))?;

        let mut scope = None;
        let mut line_no = None;
        if self.include_location {
            let (location_text, after) = take_bracketed(rest)
                .ok_or_else(|| LoggerError::formatter("text", "missing location"))?;
            if location_text != "-" {
                let (s, n) = location_text
                    .rsplit_once(':')
                    .ok_or_else(|| LoggerError::formatter("text", "location without line"))?;
                let n = n
                    .parse::<u32>()
                    .map_err(|e| LoggerError::formatter("text", format!("bad line number: {}", e)))?;
                scope = Some(s.to_string());
                line_no = Some(n);
            }
            rest = after;
        }

        let message = rest
            .strip_prefix(' ')
            .ok_or_else(|| LoggerError::formatter("text", "missing message separator"))?;

        Ok(ParsedLine {
            level,
            timestamp: timestamp.to_string(),
            scope,
            line: line_no,
            message: message.to_string(),
        })
    }
}

/// Split `[inner]rest` into `(inner, rest)`
fn take_bracketed(text: &str) -> Option<(&str, &str)> {
    text.strip_prefix('[')?.split_once(']')
}

impl Formatter for DefaultFormatter {
    fn render(&self, record: &LogRecord) -> String {
        let mut tag = String::with_capacity(5);
        let _ = write!(tag, "{:5}", record.level());
        self.render_with_tag(&tag, record)
    }

    fn name(&self) -> &str {
        "default"
    }
}

/// Fields recovered from a rendered default-format line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub level: LogLevel,
    /// Timestamp text as rendered; decode with [`TimestampFormat::parse`]
    pub timestamp: String,
    pub scope: Option<String>,
    pub line: Option<u32>,
    pub message: String,
}

/// Default layout with ANSI-colored level tags, for terminals
#[cfg(feature = "console")]
#[derive(Debug, Clone, Default)]
pub struct ColoredFormatter {
    inner: DefaultFormatter,
}

#[cfg(feature = "console")]
impl ColoredFormatter {
    #[must_use]
    pub fn new(inner: DefaultFormatter) -> Self {
        Self { inner }
    }
}

#[cfg(feature = "console")]
impl Formatter for ColoredFormatter {
    fn render(&self, record: &LogRecord) -> String {
        use colored::Colorize;

        let tag = format!("{:5}", record.level())
            .color(record.level().color_code())
            .to_string();
        self.inner.render_with_tag(&tag, record)
    }

    fn name(&self) -> &str {
        "colored"
    }
}
