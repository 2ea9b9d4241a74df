//! Dispatcher configuration
//!
//! Compiled-in defaults, optionally overridden by environment variables.
//! Bad values never fail configuration: the previous value is kept and a
//! diagnostic is recorded, which the dispatcher logs once it is running.

use super::bounded_queue::DEFAULT_QUEUE_CAPACITY;
use super::error::LoggerError;
use super::overflow_policy::OverflowPolicy;
use super::severity::Severity;
use super::timestamp::ConsoleFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_LEVEL: &str = "LOG_DISPATCH_LEVEL";
pub const ENV_CONSOLE_LEVEL: &str = "LOG_DISPATCH_CONSOLE_LEVEL";
pub const ENV_CONSOLE_DISABLE: &str = "LOG_DISPATCH_CONSOLE_DISABLE";
pub const ENV_FILE_LEVEL: &str = "LOG_DISPATCH_FILE_LEVEL";
pub const ENV_FILE: &str = "LOG_DISPATCH_FILE";

/// How long the worker waits on an empty queue before re-checking for shutdown.
pub const DEFAULT_POP_TIMEOUT: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Records below this level are discarded at the call site
    pub global_level: Severity,
    /// Register the built-in console sink
    pub console_enabled: bool,
    pub console_level: Severity,
    pub console_format: ConsoleFormat,
    pub file_level: Severity,
    /// Register the built-in file sink writing to this path
    pub file_path: Option<PathBuf>,
    pub queue_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    pub pop_timeout: Duration,
    #[serde(skip)]
    diagnostics: Vec<String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            global_level: Severity::Info,
            console_enabled: true,
            console_level: Severity::Trace,
            console_format: ConsoleFormat::default(),
            file_level: Severity::Trace,
            file_path: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            pop_timeout: DEFAULT_POP_TIMEOUT,
            diagnostics: Vec::new(),
        }
    }
}

impl DispatcherConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by environment key name.
    ///
    /// Empty values are ignored. Invalid values keep the current setting and
    /// are remembered as diagnostics.
    ///
    /// ```
    /// use log_dispatch::{DispatcherConfig, Severity};
    ///
    /// let config = DispatcherConfig::new().with_overrides(|key| match key {
    ///     "LOG_DISPATCH_LEVEL" => Some("debug".to_string()),
    ///     "LOG_DISPATCH_FILE_LEVEL" => Some("loud".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.global_level, Severity::Debug);
    /// assert_eq!(config.file_level, Severity::Trace);
    /// assert_eq!(config.diagnostics().len(), 1);
    /// ```
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(text) = lookup(ENV_LEVEL) {
            self.global_level = self.parse_level(&text, self.global_level);
        }
        if let Some(text) = lookup(ENV_CONSOLE_LEVEL) {
            self.console_level = self.parse_level(&text, self.console_level);
        }
        if let Some(text) = lookup(ENV_CONSOLE_DISABLE) {
            match parse_flag(&text) {
                Some(disable) => self.console_enabled = !disable,
                None => self
                    .diagnostics
                    .push(LoggerError::invalid_setting(ENV_CONSOLE_DISABLE, text).to_string()),
            }
        }
        if let Some(text) = lookup(ENV_FILE_LEVEL) {
            self.file_level = self.parse_level(&text, self.file_level);
        }
        if let Some(path) = lookup(ENV_FILE) {
            self.file_path = Some(PathBuf::from(path));
        }
        self
    }

    fn parse_level(&mut self, text: &str, previous: Severity) -> Severity {
        let (level, err) = Severity::parse_or(text, previous);
        if let Some(err) = err {
            self.diagnostics.push(err.to_string());
        }
        level
    }

    /// Problems found while applying overrides.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<String> {
        std::mem::take(&mut self.diagnostics)
    }

    #[must_use]
    pub fn with_global_level(mut self, level: Severity) -> Self {
        self.global_level = level;
        self
    }

    #[must_use]
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_console_level(mut self, level: Severity) -> Self {
        self.console_level = level;
        self
    }

    #[must_use]
    pub fn with_console_format(mut self, format: ConsoleFormat) -> Self {
        self.console_format = format;
        self
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_file_level(mut self, level: Severity) -> Self {
        self.file_level = level;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    #[must_use]
    pub fn with_pop_timeout(mut self, timeout: Duration) -> Self {
        self.pop_timeout = timeout;
        self
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
