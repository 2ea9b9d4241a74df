//! Log record structure

use super::severity::Severity;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

// Numeric ids are handed out on first use per thread; std's ThreadId has no
// stable integer form.
thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Identifier of the calling thread, stable for the thread's lifetime.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// Strip directories from a source path (`src/net/socket.rs` -> `socket.rs`).
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// One finished log statement.
///
/// Records are immutable once built and move from the statement into the
/// queue and on to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    timestamp: DateTime<Local>,
    severity: Severity,
    file: String,
    line: u32,
    component: String,
    thread_id: u64,
    message: String,
}

impl LogRecord {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so that one record always renders as one output line.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(
        severity: Severity,
        file: impl Into<String>,
        line: u32,
        component: impl Into<String>,
        thread_id: u64,
        message: &str,
    ) -> Self {
        Self::with_timestamp(Local::now(), severity, file, line, component, thread_id, message)
    }

    pub fn with_timestamp(
        timestamp: DateTime<Local>,
        severity: Severity,
        file: impl Into<String>,
        line: u32,
        component: impl Into<String>,
        thread_id: u64,
        message: &str,
    ) -> Self {
        Self {
            timestamp,
            severity,
            file: file.into(),
            line,
            component: component.into(),
            thread_id,
            message: Self::sanitize_message(message),
        }
    }

    #[inline]
    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Source path as given at the call site.
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn component(&self) -> &str {
        &self.component
    }

    #[inline]
    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `file:line` with the directory part of `file` removed.
    pub fn location(&self) -> String {
        format!("{}:{}", file_name(&self.file), self.line)
    }
}
