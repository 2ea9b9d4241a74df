//! Custom sink example
//!
//! Demonstrates implementing `Sink`, registering closures, and the process-wide
//! dispatcher.
//!
//! Run with: cargo run --example custom_sink

use log_dispatch::prelude::*;
use log_dispatch::{global, info, warning};
use std::collections::HashMap;

/// Counts records per component and prints a summary on flush.
#[derive(Default)]
struct ComponentCounter {
    counts: HashMap<String, usize>,
}

impl Sink for ComponentCounter {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        *self.counts.entry(record.component().to_string()).or_default() += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let mut counts: Vec<_> = self.counts.iter().collect();
        counts.sort();
        for (component, count) in counts {
            println!("   {:<8} {}", component, count);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "component-counter"
    }
}

fn main() -> Result<()> {
    println!("=== log_dispatch - Custom Sink Example ===\n");

    let dispatcher = global::install(
        DispatcherConfig::new()
            .with_console(false)
            .with_global_level(Severity::Debug),
    )?;

    println!("1. Closure sink for warnings only:");
    global::add_sink_fn("alerts", |record| {
        println!("   ALERT [{}] {}", record.component(), record.message());
    });
    global::set_sink_level("alerts", Severity::Warning);

    println!("\n2. Struct sink counting every record:");
    global::add_sink("counter", ComponentCounter::default());

    info!(dispatcher, "TX", "burst sent");
    info!(dispatcher, "TX", "burst sent");
    warning!(dispatcher, "RX", "late packet");
    info!(dispatcher, "GPS", "locked");

    println!("\n3. Per-component totals:");
    global::shutdown();

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
