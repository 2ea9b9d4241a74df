//! Integration tests for the dispatcher
//!
//! These tests verify:
//! - Global and per-sink filtering
//! - FIFO delivery across producer threads
//! - Shutdown drain
//! - Sink re-registration
//! - File sink output and open failures
//! - Overflow behavior with a stalled worker

use log_dispatch::prelude::*;
use log_dispatch::{CONSOLE_KEY, FILE_KEY};
use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

type Seen = Arc<Mutex<Vec<LogRecord>>>;

fn quiet(level: Severity) -> DispatcherConfig {
    DispatcherConfig::new()
        .with_console(false)
        .with_global_level(level)
}

fn collector(dispatcher: &Dispatcher, key: &str) -> Seen {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    dispatcher.add_sink_fn(key, move |record| sink_seen.lock().push(record.clone()));
    seen
}

fn messages(seen: &Seen) -> Vec<String> {
    seen.lock().iter().map(|r| r.message().to_string()).collect()
}

fn emit(dispatcher: &Dispatcher, severity: Severity, message: impl std::fmt::Display) {
    dispatcher
        .statement(severity, file!(), line!(), "TEST")
        .append(message)
        .finish();
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).expect("utf8 output")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Stalls the worker inside its first write until released.
struct GateSink {
    seen: Arc<Mutex<Vec<String>>>,
    entered: mpsc::Sender<()>,
    release: mpsc::Receiver<()>,
    opened: bool,
}

impl Sink for GateSink {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        self.seen.lock().push(record.message().to_string());
        if !self.opened {
            self.opened = true;
            let _ = self.entered.send(());
            let _ = self.release.recv();
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "gate"
    }
}

struct Gate {
    seen: Arc<Mutex<Vec<String>>>,
    entered: mpsc::Receiver<()>,
    release: mpsc::Sender<()>,
}

fn install_gate(dispatcher: &Dispatcher) -> Gate {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    dispatcher.add_sink(
        "gate",
        GateSink {
            seen: Arc::clone(&seen),
            entered: entered_tx,
            release: release_rx,
            opened: false,
        },
    );
    Gate {
        seen,
        entered: entered_rx,
        release: release_tx,
    }
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_global_level_filters_before_any_sink() {
    let dispatcher = Dispatcher::start(quiet(Severity::Trace)).expect("start");
    let open = collector(&dispatcher, "open");
    let errors = collector(&dispatcher, "errors");
    let fatal = collector(&dispatcher, "fatal");
    dispatcher.set_sink_level("open", Severity::Trace);
    dispatcher.set_sink_level("errors", Severity::Error);
    dispatcher.set_sink_level("fatal", Severity::Fatal);

    dispatcher.set_global_level(Severity::Warning);
    emit(&dispatcher, Severity::Info, "info");
    emit(&dispatcher, Severity::Error, "error");
    assert!(dispatcher.shutdown());

    assert_eq!(messages(&open), vec!["error"]);
    assert_eq!(messages(&errors), vec!["error"]);
    assert!(messages(&fatal).is_empty());
    assert_eq!(dispatcher.metrics().submitted_count(), 1);
}

#[test]
fn test_level_change_is_not_retroactive_for_queued_records() {
    let dispatcher = Dispatcher::start(quiet(Severity::Trace)).expect("start");
    let gate = install_gate(&dispatcher);
    let seen = collector(&dispatcher, "mem");

    emit(&dispatcher, Severity::Info, "blocker");
    gate.entered.recv().expect("worker entered gate");

    emit(&dispatcher, Severity::Debug, "queued");
    dispatcher.set_global_level(Severity::Error);
    emit(&dispatcher, Severity::Debug, "filtered");

    gate.release.send(()).expect("release gate");
    assert!(dispatcher.shutdown());

    assert_eq!(messages(&seen), vec!["blocker", "queued"]);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_fifo_per_producer_across_threads() {
    let dispatcher = Dispatcher::start(
        quiet(Severity::Trace)
            .with_queue_capacity(64)
            .with_overflow_policy(OverflowPolicy::DropNewest),
    )
    .expect("start");
    let first = collector(&dispatcher, "first");
    let second = collector(&dispatcher, "second");

    thread::scope(|scope| {
        for producer in 0..4 {
            let dispatcher = &dispatcher;
            scope.spawn(move || {
                for seq in 0..200 {
                    emit(dispatcher, Severity::Info, format!("{}:{}", producer, seq));
                }
            });
        }
    });
    assert!(dispatcher.shutdown());

    // Both sinks saw the same sequence, and each producer's records kept their order.
    let first = messages(&first);
    assert_eq!(first, messages(&second));

    let mut last_seq = [None::<u32>; 4];
    for message in &first {
        let (producer, seq) = message.split_once(':').expect("producer:seq");
        let producer: usize = producer.parse().unwrap();
        let seq: u32 = seq.parse().unwrap();
        if let Some(prev) = last_seq[producer] {
            assert!(seq > prev, "producer {} went from {} to {}", producer, prev, seq);
        }
        last_seq[producer] = Some(seq);
    }

    let metrics = dispatcher.metrics();
    assert_eq!(first.len() as u64 + metrics.dropped_count(), 800);
}

// ============================================================================
// Shutdown
// ============================================================================

#[test]
fn test_shutdown_drains_queued_records() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("drain.log");

    let dispatcher = Dispatcher::start(quiet(Severity::Trace)).expect("start");
    dispatcher.add_file_sink(&log_file);
    let gate = install_gate(&dispatcher);
    let seen = collector(&dispatcher, "mem");

    emit(&dispatcher, Severity::Info, "blocker");
    gate.entered.recv().expect("worker entered gate");

    let capacity = dispatcher.queue_capacity();
    for i in 0..capacity {
        emit(&dispatcher, Severity::Info, i);
    }
    assert_eq!(dispatcher.pending(), capacity);

    thread::scope(|scope| {
        let stopper = scope.spawn(|| dispatcher.shutdown());
        while !dispatcher.is_shut_down() {
            thread::yield_now();
        }
        gate.release.send(()).expect("release gate");
        assert!(stopper.join().expect("shutdown thread"));
    });

    let mut expected = vec!["blocker".to_string()];
    expected.extend((0..capacity).map(|i| i.to_string()));
    assert_eq!(messages(&seen), expected);
    assert_eq!(*gate.seen.lock(), expected);

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), capacity + 1);
    assert_eq!(dispatcher.pending(), 0);
}

#[test]
fn test_drop_closes_file_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("drop.log");

    {
        let dispatcher = Dispatcher::start(quiet(Severity::Trace).with_file(&log_file))
            .expect("start");
        for i in 0..5 {
            emit(&dispatcher, Severity::Warning, i);
        }
    }

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 5);
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_reregistering_console_replaces_it() {
    let dispatcher = Dispatcher::start(quiet(Severity::Trace)).expect("start");
    let old = SharedBuf::default();
    let new = SharedBuf::default();

    dispatcher.add_sink(CONSOLE_KEY, ConsoleSink::with_writer(ConsoleFormat::plain(), old.clone()));
    dispatcher.add_sink(CONSOLE_KEY, ConsoleSink::with_writer(ConsoleFormat::plain(), new.clone()));
    assert_eq!(dispatcher.sink_keys(), vec![CONSOLE_KEY.to_string()]);

    emit(&dispatcher, Severity::Info, "once");
    assert!(dispatcher.shutdown());

    assert_eq!(old.contents(), "");
    assert_eq!(new.contents(), "[info] [TEST] once\n");
}

#[test]
fn test_console_level_convenience() {
    let dispatcher = Dispatcher::start(quiet(Severity::Trace)).expect("start");
    let out = SharedBuf::default();
    dispatcher.add_sink(CONSOLE_KEY, ConsoleSink::with_writer(ConsoleFormat::plain(), out.clone()));
    dispatcher.set_console_level(Severity::Warning);

    emit(&dispatcher, Severity::Info, "quiet");
    emit(&dispatcher, Severity::Warning, "loud");
    assert!(dispatcher.shutdown());

    assert_eq!(out.contents(), "[warning] [TEST] loud\n");
}

// ============================================================================
// File sink
// ============================================================================

#[test]
fn test_file_sink_line_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("format.log");

    let dispatcher = Dispatcher::start(quiet(Severity::Trace).with_file(&log_file))
        .expect("start");
    let line = line!() + 1;
    log_dispatch::error!(dispatcher, "RADIO", "lost lock on {}", "ch0");
    assert!(dispatcher.shutdown());

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let fields: Vec<&str> = content.trim_end().split(',').collect();
    assert_eq!(fields.len(), 6, "line was {:?}", content);
    assert!(fields[1].starts_with("0x"));
    assert_eq!(fields[2], format!("integration_tests.rs:{}", line));
    assert_eq!(fields[3], "error");
    assert_eq!(fields[4], "RADIO");
    assert_eq!(fields[5], "lost lock on ch0");
    assert!(content.ends_with('\n'));
}

#[test]
fn test_file_level_filters_file_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("levels.log");

    let dispatcher = Dispatcher::start(
        quiet(Severity::Trace)
            .with_file(&log_file)
            .with_file_level(Severity::Error),
    )
    .expect("start");
    let seen = collector(&dispatcher, "mem");

    emit(&dispatcher, Severity::Info, "info");
    emit(&dispatcher, Severity::Fatal, "fatal");
    assert!(dispatcher.shutdown());

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains(",fatal,TEST,fatal"));
    assert_eq!(messages(&seen), vec!["info", "fatal"]);
}

#[test]
fn test_unwritable_file_degrades_to_console() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let bad_path = temp_dir.path().join("no-such-dir").join("app.log");

    let dispatcher = Dispatcher::start(quiet(Severity::Trace)).expect("start");
    let out = SharedBuf::default();
    dispatcher.add_sink(CONSOLE_KEY, ConsoleSink::with_writer(ConsoleFormat::plain(), out.clone()));

    assert!(!dispatcher.add_file_sink(&bad_path));
    assert!(dispatcher.has_sink(FILE_KEY));

    emit(&dispatcher, Severity::Error, "still logging");
    assert!(dispatcher.shutdown());

    let output = out.contents();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("[error] [LOG] Error opening log file"));
    assert_eq!(lines[1], "[error] [TEST] still logging");
    assert!(!bad_path.exists());
    assert_eq!(dispatcher.metrics().sink_error_count(), 0);
}

#[test]
fn test_unwritable_file_in_config_does_not_fail_start() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let bad_path = temp_dir.path().join("missing").join("app.log");

    let dispatcher = Dispatcher::start(quiet(Severity::Trace).with_file(&bad_path))
        .expect("start must not fail on a bad log path");
    let seen = collector(&dispatcher, "mem");
    emit(&dispatcher, Severity::Info, "ok");
    assert!(dispatcher.shutdown());

    assert_eq!(messages(&seen), vec!["ok"]);
}

#[test]
fn test_config_diagnostics_are_logged_through_sinks() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("diag.log");

    let config = quiet(Severity::Trace)
        .with_file(&log_file)
        .with_overrides(|key| (key == "LOG_DISPATCH_CONSOLE_LEVEL").then(|| "chatty".to_string()));
    let dispatcher = Dispatcher::start(config).expect("start");
    assert!(dispatcher.shutdown());

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(
        content.contains(",error,LOG,Failed to set log level to: chatty"),
        "content was {:?}",
        content
    );
}

// ============================================================================
// Overflow
// ============================================================================

#[test]
fn test_overflow_drop_newest_with_stalled_worker() {
    let dispatcher = Dispatcher::start(
        quiet(Severity::Trace)
            .with_queue_capacity(10)
            .with_overflow_policy(OverflowPolicy::DropNewest),
    )
    .expect("start");
    let gate = install_gate(&dispatcher);

    emit(&dispatcher, Severity::Info, "blocker");
    gate.entered.recv().expect("worker entered gate");

    for i in 0..15 {
        emit(&dispatcher, Severity::Info, i);
    }
    assert_eq!(dispatcher.pending(), 10);
    assert_eq!(dispatcher.metrics().dropped_count(), 5);

    gate.release.send(()).expect("release gate");
    assert!(dispatcher.shutdown());

    let mut expected = vec!["blocker".to_string()];
    expected.extend((0..10).map(|i| i.to_string()));
    assert_eq!(*gate.seen.lock(), expected);
    assert_eq!(dispatcher.metrics().evicted_count(), 0);
}

#[test]
fn test_overflow_drop_oldest_with_stalled_worker() {
    let dispatcher = Dispatcher::start(
        quiet(Severity::Trace)
            .with_queue_capacity(10)
            .with_overflow_policy(OverflowPolicy::DropOldest),
    )
    .expect("start");
    let gate = install_gate(&dispatcher);

    emit(&dispatcher, Severity::Info, "blocker");
    gate.entered.recv().expect("worker entered gate");

    for i in 0..15 {
        emit(&dispatcher, Severity::Info, i);
    }
    assert_eq!(dispatcher.pending(), 10);
    assert_eq!(dispatcher.metrics().evicted_count(), 5);

    gate.release.send(()).expect("release gate");
    assert!(dispatcher.shutdown());

    let mut expected = vec!["blocker".to_string()];
    expected.extend((5..15).map(|i| i.to_string()));
    assert_eq!(*gate.seen.lock(), expected);
    assert_eq!(dispatcher.metrics().dropped_count(), 0);
}

#[test]
fn test_producers_never_block_on_stalled_worker() {
    let dispatcher = Dispatcher::start(quiet(Severity::Trace)).expect("start");
    let gate = install_gate(&dispatcher);

    emit(&dispatcher, Severity::Info, "blocker");
    gate.entered.recv().expect("worker entered gate");

    let start = std::time::Instant::now();
    for i in 0..10_000 {
        emit(&dispatcher, Severity::Info, i);
    }
    assert!(start.elapsed() < std::time::Duration::from_secs(5));
    assert!(dispatcher.pending() <= dispatcher.queue_capacity());

    gate.release.send(()).expect("release gate");
    assert!(dispatcher.shutdown());
}
