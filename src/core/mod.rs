//! Core dispatcher types and traits

pub mod bounded_queue;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod log_record;
pub mod metrics;
pub mod overflow_policy;
pub mod severity;
pub mod sink;
pub mod statement;
pub mod timestamp;

pub use bounded_queue::{BoundedQueue, DEFAULT_QUEUE_CAPACITY};
pub use config::DispatcherConfig;
pub use dispatcher::{Dispatcher, DEFAULT_SHUTDOWN_TIMEOUT, INTERNAL_COMPONENT};
pub use error::{LoggerError, Result};
pub use log_record::{current_thread_id, LogRecord};
pub use metrics::DispatcherMetrics;
pub use overflow_policy::{OverflowPolicy, PushOutcome};
pub use severity::Severity;
pub use sink::{FnSink, Sink};
pub use statement::LogStatement;
pub use timestamp::{ConsoleFormat, TimestampFormat, SIMPLE_FORMAT};
