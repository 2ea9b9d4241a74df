//! Sink trait for log output destinations

use super::{error::Result, log_record::LogRecord};

/// A destination that emits or persists log records.
///
/// Sinks are only ever driven from the dispatcher's consumer thread (or while
/// holding the dispatcher's sink lock), so implementations need no internal
/// locking of their own.
pub trait Sink: Send {
    fn write(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Adapts a closure into a [`Sink`].
///
/// # Example
///
/// ```
/// use log_dispatch::{FnSink, Sink};
///
/// let sink = FnSink::new("stdout", |record| {
///     println!("{} {}", record.severity(), record.message());
/// });
/// assert_eq!(sink.name(), "stdout");
/// ```
pub struct FnSink<F> {
    name: String,
    func: F,
}

impl<F> FnSink<F>
where
    F: FnMut(&LogRecord) + Send,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Sink for FnSink<F>
where
    F: FnMut(&LogRecord) + Send,
{
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        (self.func)(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
