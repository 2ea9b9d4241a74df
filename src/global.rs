//! Process-wide dispatcher
//!
//! One [`Dispatcher`] per process, created on first use from
//! [`DispatcherConfig::from_env`] or installed explicitly with [`install`].
//! Statics are never dropped, so call [`shutdown`] before the process exits
//! to drain the queue and close the log file.

use crate::core::{Dispatcher, DispatcherConfig, LogRecord, LoggerError, Result, Severity, Sink};
use once_cell::sync::OnceCell;

static DISPATCHER: OnceCell<Dispatcher> = OnceCell::new();

/// The process-wide dispatcher, starting it from the environment on first use.
///
/// # Panics
///
/// Panics if the worker thread cannot be spawned during first use. This is
/// the only startup failure treated as fatal.
pub fn dispatcher() -> &'static Dispatcher {
    DISPATCHER.get_or_init(|| match Dispatcher::start(DispatcherConfig::from_env()) {
        Ok(dispatcher) => dispatcher,
        Err(e) => panic!("failed to start log dispatcher: {}", e),
    })
}

/// Start the process-wide dispatcher with `config`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] if it is already running
/// (including when it was started implicitly by [`dispatcher`]).
pub fn install(config: DispatcherConfig) -> Result<&'static Dispatcher> {
    let mut started = false;
    let dispatcher = DISPATCHER.get_or_try_init(|| {
        started = true;
        Dispatcher::start(config)
    })?;

    if started {
        Ok(dispatcher)
    } else {
        Err(LoggerError::AlreadyInitialized)
    }
}

/// Whether the process-wide dispatcher has been started.
pub fn is_initialized() -> bool {
    DISPATCHER.get().is_some()
}

/// Drain and stop the process-wide dispatcher if it was started.
pub fn shutdown() -> bool {
    DISPATCHER.get().map_or(true, Dispatcher::shutdown)
}

pub fn add_sink<S: Sink + 'static>(key: impl Into<String>, sink: S) {
    dispatcher().add_sink(key, sink);
}

pub fn add_sink_fn<F>(key: impl Into<String>, func: F)
where
    F: FnMut(&LogRecord) + Send + 'static,
{
    dispatcher().add_sink_fn(key, func);
}

pub fn set_global_level(level: Severity) {
    dispatcher().set_global_level(level);
}

pub fn set_sink_level(key: impl Into<String>, level: Severity) {
    dispatcher().set_sink_level(key, level);
}

pub fn set_console_level(level: Severity) {
    dispatcher().set_console_level(level);
}

pub fn set_file_level(level: Severity) {
    dispatcher().set_file_level(level);
}
