//! Built-in sinks

pub mod console;
pub mod file;

pub use console::ConsoleSink;
pub use file::FileSink;

// Re-export traits for convenience
pub use crate::core::{FnSink, Sink};

/// Registry key of the built-in console sink.
pub const CONSOLE_KEY: &str = "console";

/// Registry key of the built-in file sink.
pub const FILE_KEY: &str = "file";
