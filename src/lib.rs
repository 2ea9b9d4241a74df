//! # log_dispatch
//!
//! An asynchronous, multi-sink logging pipeline.
//!
//! ## Features
//!
//! - **Non-blocking producers**: call sites filter by the global level and
//!   push onto a small bounded queue; a full queue loses a record according to
//!   an explicit [`OverflowPolicy`] instead of stalling the caller
//! - **Single consumer**: one background worker owns all sink I/O
//! - **Per-sink thresholds**: console, file and custom sinks each filter
//!   independently
//! - **Clean shutdown**: the worker drains everything already queued before
//!   the sinks are closed

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        ConsoleFormat, Dispatcher, DispatcherConfig, DispatcherMetrics, FnSink, LogRecord,
        LogStatement, LoggerError, OverflowPolicy, Result, Severity, Sink, TimestampFormat,
    };
    pub use crate::sinks::{ConsoleSink, FileSink};
}

pub use crate::core::{
    current_thread_id, BoundedQueue, ConsoleFormat, Dispatcher, DispatcherConfig,
    DispatcherMetrics, FnSink, LogRecord, LogStatement, LoggerError, OverflowPolicy, PushOutcome,
    Result, Severity, Sink, TimestampFormat, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{ConsoleSink, FileSink, CONSOLE_KEY, FILE_KEY};
