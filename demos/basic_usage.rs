//! Basic dispatcher usage example
//!
//! Demonstrates the console sink, the logging macros and the global level.
//!
//! Run with: cargo run --example basic_usage

use log_dispatch::prelude::*;
use log_dispatch::{debug, error, fatal, info, trace, warning};

fn main() -> Result<()> {
    println!("=== log_dispatch - Basic Usage Example ===\n");

    // Console sink with source locations and thread ids
    let dispatcher = Dispatcher::start(
        DispatcherConfig::new()
            .with_global_level(Severity::Trace)
            .with_console_format(ConsoleFormat::new().with_thread_id(true).with_source(true)),
    )?;

    println!("1. Logging at different levels:");
    trace!(dispatcher, "DEMO", "This is a trace message");
    debug!(dispatcher, "DEMO", "This is a debug message");
    info!(dispatcher, "DEMO", "This is an info message");
    warning!(dispatcher, "DEMO", "This is a warning message");
    error!(dispatcher, "DEMO", "This is an error message");
    fatal!(dispatcher, "DEMO", "This is a fatal message");
    dispatcher.flush()?;

    println!("\n2. Raising the global level to warning:");
    dispatcher.set_global_level(Severity::Warning);
    debug!(dispatcher, "DEMO", "Debug message (hidden)");
    info!(dispatcher, "DEMO", "Info message (hidden)");
    warning!(dispatcher, "DEMO", "Warning message (visible)");

    println!("\n3. Building a statement piece by piece:");
    dispatcher
        .statement(Severity::Error, file!(), line!(), "RADIO")
        .append("tuned to ")
        .append(2450.0)
        .append(" MHz, gain ")
        .append(31.5)
        .finish();

    dispatcher.shutdown();
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
