//! Call-site builder for a single log record

use super::{dispatcher::Dispatcher, log_record::LogRecord, severity::Severity};
use chrono::{DateTime, Local};
use std::fmt;

struct Pending {
    timestamp: DateTime<Local>,
    severity: Severity,
    file: String,
    line: u32,
    component: String,
    thread_id: u64,
    message: String,
}

/// A log statement in progress.
///
/// The global level is checked once, when the statement is created. A
/// disabled statement captures nothing and ignores every fragment appended to
/// it. An enabled statement is submitted exactly once: by [`finish`], or when
/// it is dropped without having been finished.
///
/// [`finish`]: LogStatement::finish
///
/// # Example
///
/// ```
/// use log_dispatch::{Dispatcher, DispatcherConfig, LogStatement, Severity};
/// use std::fmt::Write;
///
/// let dispatcher = Dispatcher::start(DispatcherConfig::new().with_console(false)).unwrap();
///
/// let mut statement = LogStatement::new(&dispatcher, Severity::Warning, file!(), line!(), "RX", 1);
/// write!(statement, "overflow on channel {}", 3).unwrap();
/// statement.finish();
/// ```
#[must_use = "a statement is submitted when finished or dropped"]
pub struct LogStatement<'a> {
    dispatcher: &'a Dispatcher,
    pending: Option<Pending>,
}

impl<'a> LogStatement<'a> {
    pub fn new(
        dispatcher: &'a Dispatcher,
        severity: Severity,
        file: &str,
        line: u32,
        component: &str,
        thread_id: u64,
    ) -> Self {
        let pending = dispatcher.is_enabled(severity).then(|| Pending {
            timestamp: Local::now(),
            severity,
            file: file.to_string(),
            line,
            component: component.to_string(),
            thread_id,
            message: String::new(),
        });

        Self {
            dispatcher,
            pending,
        }
    }

    /// Whether this statement will be submitted.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.pending.is_some()
    }

    /// Append a message fragment.
    pub fn append(mut self, fragment: impl fmt::Display) -> Self {
        if let Some(pending) = self.pending.as_mut() {
            let _ = fmt::Write::write_fmt(&mut pending.message, format_args!("{}", fragment));
        }
        self
    }

    /// Submit the record now.
    pub fn finish(mut self) {
        self.commit();
    }

    fn commit(&mut self) {
        if let Some(pending) = self.pending.take() {
            let record = LogRecord::with_timestamp(
                pending.timestamp,
                pending.severity,
                pending.file,
                pending.line,
                pending.component,
                pending.thread_id,
                &pending.message,
            );
            self.dispatcher.submit(record);
        }
    }
}

impl fmt::Write for LogStatement<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(pending) = self.pending.as_mut() {
            pending.message.push_str(s);
        }
        Ok(())
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        match self.pending.as_mut() {
            Some(pending) => fmt::Write::write_fmt(&mut pending.message, args),
            None => Ok(()),
        }
    }
}

impl Drop for LogStatement<'_> {
    fn drop(&mut self) {
        self.commit();
    }
}
