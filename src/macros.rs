//! Logging macros for call sites.
//!
//! Each macro starts a statement with the caller's `file!()` and `line!()`,
//! formats its arguments only when the statement passes the global level,
//! and submits it.
//!
//! # Examples
//!
//! ```
//! use log_dispatch::{info, Dispatcher, DispatcherConfig};
//!
//! let dispatcher = Dispatcher::start(DispatcherConfig::new()).unwrap();
//!
//! info!(dispatcher, "SERVER", "started");
//!
//! let port = 8080;
//! info!(dispatcher, "SERVER", "listening on port {}", port);
//! ```

/// Log a message at an explicit severity.
///
/// # Examples
///
/// ```
/// # use log_dispatch::{Dispatcher, DispatcherConfig, Severity};
/// # let dispatcher = Dispatcher::start(DispatcherConfig::new().with_console(false)).unwrap();
/// use log_dispatch::log;
/// log!(dispatcher, Severity::Info, "CORE", "Simple message");
/// log!(dispatcher, Severity::Error, "CORE", "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($dispatcher:expr, $severity:expr, $component:expr, $($arg:tt)+) => {{
        let mut statement = $dispatcher.statement($severity, file!(), line!(), $component);
        if statement.is_enabled() {
            let _ = ::std::fmt::Write::write_fmt(&mut statement, format_args!($($arg)+));
        }
        statement.finish();
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($dispatcher:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Trace, $component, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($dispatcher:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Debug, $component, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($dispatcher:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Info, $component, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use log_dispatch::{Dispatcher, DispatcherConfig};
/// # let dispatcher = Dispatcher::start(DispatcherConfig::new().with_console(false)).unwrap();
/// use log_dispatch::warning;
/// warning!(dispatcher, "DISK", "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($dispatcher:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Warning, $component, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($dispatcher:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Error, $component, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($dispatcher:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Fatal, $component, $($arg)+)
    };
}
