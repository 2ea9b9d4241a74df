//! File logging example
//!
//! Demonstrates the file sink, per-sink thresholds and configuration from the
//! environment.
//!
//! Run with: cargo run --example file_logging
//!
//! Try: LOG_DISPATCH_FILE_LEVEL=error cargo run --example file_logging

use log_dispatch::prelude::*;
use log_dispatch::{error, info, warning};

fn main() -> Result<()> {
    println!("=== log_dispatch - File Logging Example ===\n");

    let log_path = std::env::temp_dir().join("log_dispatch_demo.log");
    let _ = std::fs::remove_file(&log_path);

    // Environment overrides win over the values set here
    let config = DispatcherConfig::new()
        .with_global_level(Severity::Debug)
        .with_console_level(Severity::Warning)
        .with_file(&log_path)
        .with_overrides(|key| std::env::var(key).ok());
    for problem in config.diagnostics() {
        println!("   config problem: {}", problem);
    }

    let dispatcher = Dispatcher::start(config)?;

    println!("1. Writing to {} (console shows warnings and above):", log_path.display());
    for channel in 0..3 {
        info!(dispatcher, "RX", "channel {} streaming", channel);
    }
    warning!(dispatcher, "RX", "overflow on channel {}", 1);
    error!(dispatcher, "RX", "channel {} lost lock", 2);

    println!("\n2. Tightening the file threshold at runtime:");
    dispatcher.set_file_level(Severity::Error);
    info!(dispatcher, "RX", "not written to the file");
    error!(dispatcher, "RX", "written to the file");

    // Drains the queue and closes the file
    dispatcher.shutdown();

    println!("\n3. File contents:");
    let content = std::fs::read_to_string(&log_path)?;
    for line in content.lines() {
        println!("   {}", line);
    }

    let metrics = dispatcher.metrics();
    println!(
        "\n   submitted: {}, delivered: {}, lost: {}",
        metrics.submitted_count(),
        metrics.delivered_count(),
        metrics.lost_count()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
