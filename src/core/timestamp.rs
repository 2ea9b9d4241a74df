//! Timestamp formatting and console line layout options

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Layout used by the file sink; fixed for compatibility with existing log readers.
pub const SIMPLE_FORMAT: &str = "%Y-%b-%d %H:%M:%S%.6f";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use log_dispatch::TimestampFormat;
/// use chrono::Local;
///
/// let format = TimestampFormat::Simple;
/// let text = format.format(&Local::now());
/// assert_eq!(text.len(), "2025-Jan-08 10:30:45.123456".len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local time with month abbreviation and microseconds:
    /// `2025-Jan-08 10:30:45.123456`
    #[default]
    Simple,

    /// ISO 8601 local time with milliseconds: `2025-01-08T10:30:45.123`
    Iso8601,

    /// RFC 3339 with offset: `2025-01-08T10:30:45.123456+01:00`
    Rfc3339,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::Simple => datetime.format(SIMPLE_FORMAT).to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

/// Which optional fields the console sink prints
///
/// Severity, component and message are always printed.
///
/// # Examples
///
/// ```
/// use log_dispatch::{ConsoleFormat, TimestampFormat};
///
/// let format = ConsoleFormat::new()
///     .with_color(false)
///     .with_thread_id(true)
///     .with_timestamp_format(TimestampFormat::Iso8601);
/// assert!(format.thread_id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleFormat {
    /// Wrap the line in a severity color
    pub color: bool,
    /// Print `[timestamp]`
    pub timestamp: bool,
    /// Print `[0x<thread id>]`
    pub thread_id: bool,
    /// Print `[file:line]`
    pub source: bool,
    pub timestamp_format: TimestampFormat,
}

impl Default for ConsoleFormat {
    fn default() -> Self {
        Self {
            color: cfg!(feature = "console-color"),
            timestamp: true,
            thread_id: false,
            source: false,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl ConsoleFormat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `[severity] [component] message`.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            color: false,
            timestamp: false,
            thread_id: false,
            source: false,
            timestamp_format: TimestampFormat::default(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_thread_id(mut self, thread_id: bool) -> Self {
        self.thread_id = thread_id;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: bool) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}
