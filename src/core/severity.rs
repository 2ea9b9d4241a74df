//! Severity scale and threshold filtering

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered severity levels, most verbose first.
///
/// `Off` is a threshold sentinel meaning "suppress everything"; it is never
/// the severity of a delivered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
    Off = 6,
}

impl Severity {
    /// Every level a record can carry, in ascending order.
    pub const RECORD_LEVELS: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Off => "off",
        }
    }

    /// Ordinal position on the scale.
    #[inline]
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Severity::Trace),
            1 => Some(Severity::Debug),
            2 => Some(Severity::Info),
            3 => Some(Severity::Warning),
            4 => Some(Severity::Error),
            5 => Some(Severity::Fatal),
            6 => Some(Severity::Off),
            _ => None,
        }
    }

    /// `true` when a record at this level passes a filter set to `threshold`.
    #[inline]
    pub fn passes(&self, threshold: Severity) -> bool {
        *self >= threshold
    }

    /// Parse `text`, falling back to `previous` when it is not a valid level.
    ///
    /// The parse error is handed back alongside the fallback so the caller can
    /// report it; the returned level is always usable.
    ///
    /// ```
    /// use log_dispatch::Severity;
    ///
    /// let (level, err) = Severity::parse_or("warning", Severity::Info);
    /// assert_eq!(level, Severity::Warning);
    /// assert!(err.is_none());
    ///
    /// let (level, err) = Severity::parse_or("9", Severity::Info);
    /// assert_eq!(level, Severity::Info);
    /// assert!(err.is_some());
    /// ```
    pub fn parse_or(text: &str, previous: Severity) -> (Severity, Option<LoggerError>) {
        match text.parse() {
            Ok(level) => (level, None),
            Err(err) => (previous, Some(err)),
        }
    }

    #[cfg(feature = "console-color")]
    pub fn color(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Trace => Magenta,
            Severity::Debug => Blue,
            Severity::Info => Green,
            Severity::Warning => Yellow,
            Severity::Error => Red,
            Severity::Fatal => BrightRed,
            Severity::Off => White,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    /// Accepts a numeric ordinal within `[trace, fatal]` or an exact,
    /// case-sensitive level name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<u8>()
                .ok()
                .and_then(Severity::from_ordinal)
                .filter(|level| *level <= Severity::Fatal)
                .ok_or_else(|| LoggerError::invalid_level(s));
        }

        match s {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "off" => Ok(Severity::Off),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}
