//! Dispatcher: the queue, the sink registry, the thresholds and the worker

use super::{
    bounded_queue::BoundedQueue,
    config::DispatcherConfig,
    error::{LoggerError, Result},
    log_record::{current_thread_id, LogRecord},
    metrics::DispatcherMetrics,
    overflow_policy::{OverflowPolicy, PushOutcome},
    severity::Severity,
    sink::{FnSink, Sink},
    statement::LogStatement,
};
use crate::sinks::{ConsoleSink, FileSink, CONSOLE_KEY, FILE_KEY};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default time `shutdown()` and `Drop` wait for the worker to drain (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Component tag of records the dispatcher emits about itself.
pub const INTERNAL_COMPONENT: &str = "LOG";

const WORKER_THREAD_NAME: &str = "log-dispatch";
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(1);

type SinkMap = BTreeMap<String, Box<dyn Sink>>;

/// State shared between the handle and the worker thread.
struct Shared {
    global_level: RwLock<Severity>,
    /// Per-key thresholds, kept apart from the sinks so a level can be set
    /// before its sink is registered.
    sink_levels: RwLock<HashMap<String, Severity>>,
    /// All sink I/O happens with this lock held.
    sinks: Mutex<SinkMap>,
    exit: AtomicBool,
    queue: BoundedQueue<LogRecord>,
    metrics: DispatcherMetrics,
    pop_timeout: Duration,
}

impl Shared {
    /// Worker loop: dispatch until asked to exit, then drain what is queued.
    fn run(&self) {
        while !self.exit.load(Ordering::Acquire) {
            if let Some(record) = self.queue.pop_timeout(self.pop_timeout) {
                self.dispatch(&record);
            }
        }

        while let Some(record) = self.queue.try_pop() {
            self.dispatch(&record);
        }

        let _ = self.flush_sinks();
    }

    /// Hand `record` to every sink whose threshold it passes.
    ///
    /// **Per-sink panic isolation**: each sink call is wrapped in
    /// `catch_unwind`, so one failing sink never keeps the record from the
    /// others.
    fn dispatch(&self, record: &LogRecord) {
        let mut sinks = self.sinks.lock();

        for (key, sink) in sinks.iter_mut() {
            let threshold = self.sink_levels.read().get(key).copied();
            if let Some(threshold) = threshold {
                if !record.severity().passes(threshold) {
                    continue;
                }
            }

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.write(record)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink '{}' ({}) failed: {}", key, sink.name(), e);
                    self.metrics.record_sink_error();
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' ({}) panicked: {}. \
                         Other sinks continue to function.",
                        key,
                        sink.name(),
                        panic_message(&*panic_info)
                    );
                    self.metrics.record_sink_error();
                }
            }
        }

        self.metrics.record_delivered();
    }

    /// Flush every sink, each isolated like `dispatch`.
    ///
    /// All sinks are visited even when one fails; the first failure is
    /// returned. A panic in `flush` comes back as [`LoggerError::Sink`].
    fn flush_sinks(&self) -> Result<()> {
        let mut first_error = None;
        let mut sinks = self.sinks.lock();

        for (key, sink) in sinks.iter_mut() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));
            let error = match result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Sink '{}' ({}) flush failed: {}",
                        key,
                        sink.name(),
                        e
                    );
                    e
                }
                Err(panic_info) => {
                    let message = panic_message(&*panic_info);
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' ({}) panicked during flush: {}",
                        key,
                        sink.name(),
                        message
                    );
                    LoggerError::sink(sink.name(), format!("panicked during flush: {}", message))
                }
            };
            self.metrics.record_sink_error();
            first_error.get_or_insert(error);
        }

        first_error.map_or(Ok(()), Err)
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Owner of the logging pipeline.
///
/// Producers on any thread build records through [`Dispatcher::statement`]
/// (or the logging macros) and hand them over with [`Dispatcher::submit`],
/// which never blocks. One background worker takes records off a bounded
/// queue and fans each out to the registered sinks, in key order, skipping
/// sinks whose threshold the record does not pass.
///
/// Sinks are driven while the registry lock is held, so a sink must not call
/// back into the registration API (`add_sink`, `remove_sink`, `flush`) from
/// its `write`.
///
/// # Example
///
/// ```
/// use log_dispatch::{Dispatcher, DispatcherConfig, Severity};
///
/// let dispatcher = Dispatcher::start(
///     DispatcherConfig::new().with_global_level(Severity::Debug),
/// )
/// .expect("worker thread");
///
/// dispatcher
///     .statement(Severity::Info, file!(), line!(), "DEMO")
///     .append("tuned to ")
///     .append(915.0)
///     .append(" MHz")
///     .finish();
///
/// assert!(dispatcher.shutdown());
/// ```
pub struct Dispatcher {
    shared: Arc<Shared>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Dispatcher {
    /// Build the pipeline described by `config` and start its worker.
    ///
    /// Registers the console sink unless disabled, opens the file sink when a
    /// path is configured, spawns the worker, then logs any configuration
    /// diagnostics as `error` records from the `LOG` component.
    pub fn start(mut config: DispatcherConfig) -> Result<Self> {
        let diagnostics = config.take_diagnostics();

        let dispatcher = Self {
            shared: Arc::new(Shared {
                global_level: RwLock::new(config.global_level),
                sink_levels: RwLock::new(HashMap::new()),
                sinks: Mutex::new(BTreeMap::new()),
                exit: AtomicBool::new(false),
                queue: BoundedQueue::new(config.queue_capacity, config.overflow_policy),
                metrics: DispatcherMetrics::new(),
                pop_timeout: config.pop_timeout,
            }),
            worker: Mutex::new(None),
        };

        if config.console_enabled {
            dispatcher.set_console_level(config.console_level);
            dispatcher.add_sink(
                CONSOLE_KEY,
                ConsoleSink::with_format(config.console_format.clone()),
            );
        }

        if let Some(path) = config.file_path.as_ref() {
            dispatcher.set_file_level(config.file_level);
            dispatcher.add_file_sink(path);
        }

        let shared = Arc::clone(&dispatcher.shared);
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || shared.run())
            .map_err(LoggerError::WorkerSpawn)?;
        *dispatcher.worker.lock() = Some(handle);

        for message in diagnostics {
            dispatcher.internal(Severity::Error, &message);
        }

        Ok(dispatcher)
    }

    /// Start a log statement on the calling thread.
    pub fn statement(
        &self,
        severity: Severity,
        file: &str,
        line: u32,
        component: &str,
    ) -> LogStatement<'_> {
        LogStatement::new(self, severity, file, line, component, current_thread_id())
    }

    /// Whether a statement at `severity` would be submitted right now.
    #[inline]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity != Severity::Off && severity.passes(*self.shared.global_level.read())
    }

    /// Queue `record` for the worker without blocking.
    ///
    /// A full queue loses a record according to the configured
    /// [`OverflowPolicy`]; records submitted after shutdown was requested are
    /// discarded. Both cases are counted in [`Dispatcher::metrics`].
    pub fn submit(&self, record: LogRecord) {
        self.shared.metrics.record_submitted();

        if self.shared.exit.load(Ordering::Acquire) {
            self.shared.metrics.record_dropped();
            return;
        }

        match self.shared.queue.push(record) {
            PushOutcome::Enqueued => {}
            PushOutcome::Dropped => {
                let previous = self.shared.metrics.record_dropped();
                self.alert_overflow(previous + 1);
            }
            PushOutcome::Evicted => {
                let previous = self.shared.metrics.record_evicted();
                self.alert_overflow(previous + 1);
            }
        }
    }

    /// Warn on stderr for the first loss and every thousandth after it.
    fn alert_overflow(&self, lost: u64) {
        if lost == 1 || lost % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] Queue full ({} records, policy {}), {} logs lost.",
                self.shared.queue.capacity(),
                self.shared.queue.policy(),
                lost
            );
        }
    }

    /// Submit a record tagged with [`INTERNAL_COMPONENT`].
    pub(crate) fn internal(&self, severity: Severity, message: &str) {
        self.statement(severity, file!(), line!(), INTERNAL_COMPONENT)
            .append(message)
            .finish();
    }

    /// Register `sink` under `key`, replacing (and closing) any sink already
    /// registered there.
    pub fn add_sink<S: Sink + 'static>(&self, key: impl Into<String>, sink: S) {
        self.add_boxed_sink(key, Box::new(sink));
    }

    pub fn add_boxed_sink(&self, key: impl Into<String>, sink: Box<dyn Sink>) {
        let previous = self.shared.sinks.lock().insert(key.into(), sink);
        drop(previous);
    }

    /// Register a closure as a sink.
    ///
    /// ```
    /// use log_dispatch::{Dispatcher, DispatcherConfig};
    ///
    /// let dispatcher = Dispatcher::start(DispatcherConfig::new().with_console(false)).unwrap();
    /// dispatcher.add_sink_fn("stdout", |record| println!("{}", record.message()));
    /// assert!(dispatcher.has_sink("stdout"));
    /// ```
    pub fn add_sink_fn<F>(&self, key: impl Into<String>, func: F)
    where
        F: FnMut(&LogRecord) + Send + 'static,
    {
        let key = key.into();
        let sink = FnSink::new(key.clone(), func);
        self.add_sink(key, sink);
    }

    /// Unregister and close the sink under `key`. Its threshold is kept.
    pub fn remove_sink(&self, key: &str) -> bool {
        let removed = self.shared.sinks.lock().remove(key);
        removed.is_some()
    }

    pub fn has_sink(&self, key: &str) -> bool {
        self.shared.sinks.lock().contains_key(key)
    }

    /// Registered keys in dispatch order.
    pub fn sink_keys(&self) -> Vec<String> {
        self.shared.sinks.lock().keys().cloned().collect()
    }

    /// Open `path` for append and register it as the `"file"` sink.
    ///
    /// If the file cannot be opened, one error is written straight to the
    /// console sink (or stderr when there is none) and a no-op file sink is
    /// registered instead. Returns whether the file was opened.
    pub fn add_file_sink(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let sink = match FileSink::open(path) {
            Ok(sink) => sink,
            Err(e) => {
                self.report_to_console(&format!("Error opening log file: {}", e));
                FileSink::disabled(path)
            }
        };

        let opened = sink.is_open();
        self.add_sink(FILE_KEY, sink);
        opened
    }

    fn report_to_console(&self, message: &str) {
        let record = LogRecord::new(
            Severity::Error,
            file!(),
            line!(),
            INTERNAL_COMPONENT,
            current_thread_id(),
            message,
        );

        let mut sinks = self.shared.sinks.lock();
        let written = sinks
            .get_mut(CONSOLE_KEY)
            .map(|console| console.write(&record).is_ok())
            .unwrap_or(false);
        if !written {
            eprintln!("[LOGGER ERROR] {}", message);
        }
    }

    pub fn set_global_level(&self, level: Severity) {
        *self.shared.global_level.write() = level;
    }

    pub fn global_level(&self) -> Severity {
        *self.shared.global_level.read()
    }

    /// Set the threshold for the sink under `key`, registered or not.
    pub fn set_sink_level(&self, key: impl Into<String>, level: Severity) {
        self.shared.sink_levels.write().insert(key.into(), level);
    }

    /// Explicit threshold for `key`; `None` means no filtering beyond the
    /// global level.
    pub fn sink_level(&self, key: &str) -> Option<Severity> {
        self.shared.sink_levels.read().get(key).copied()
    }

    pub fn clear_sink_level(&self, key: &str) {
        self.shared.sink_levels.write().remove(key);
    }

    pub fn set_console_level(&self, level: Severity) {
        self.set_sink_level(CONSOLE_KEY, level);
    }

    pub fn set_file_level(&self, level: Severity) {
        self.set_sink_level(FILE_KEY, level);
    }

    /// Flush every registered sink.
    ///
    /// A sink that fails or panics does not keep the others from being
    /// flushed; the first failure is returned.
    pub fn flush(&self) -> Result<()> {
        self.shared.flush_sinks()
    }

    /// Get the dispatcher metrics
    ///
    /// ```
    /// use log_dispatch::{Dispatcher, DispatcherConfig};
    ///
    /// let dispatcher = Dispatcher::start(DispatcherConfig::new().with_console(false)).unwrap();
    /// let metrics = dispatcher.metrics();
    /// println!("Lost: {}", metrics.lost_count());
    /// println!("Loss rate: {:.2}%", metrics.loss_rate());
    /// ```
    pub fn metrics(&self) -> &DispatcherMetrics {
        &self.shared.metrics
    }

    /// Records waiting for the worker.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.shared.queue.capacity()
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.shared.queue.policy()
    }

    /// Whether shutdown has been requested.
    pub fn is_shut_down(&self) -> bool {
        self.shared.exit.load(Ordering::Acquire)
    }

    /// Shut down with [`DEFAULT_SHUTDOWN_TIMEOUT`].
    pub fn shutdown(&self) -> bool {
        self.shutdown_timeout(DEFAULT_SHUTDOWN_TIMEOUT)
    }

    /// Stop the worker and release the sinks
    ///
    /// Sets the exit flag, waits up to `timeout` for the worker to drain the
    /// queue and return, then drops every sink (closing the log file). Safe to
    /// call more than once.
    ///
    /// # Returns
    ///
    /// `true` if the worker finished within `timeout`, `false` otherwise. On
    /// timeout the sinks stay registered so the worker can finish its drain;
    /// calling `shutdown` again waits once more.
    pub fn shutdown_timeout(&self, timeout: Duration) -> bool {
        self.shared.exit.store(true, Ordering::Release);

        let mut worker = self.worker.lock();
        let mut clean = true;
        let stopped_now = worker.is_some();
        if let Some(handle) = worker.take() {
            let start = Instant::now();
            while !handle.is_finished() {
                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Dispatcher worker did not finish within {:?}. \
                         Some logs may be lost.",
                        timeout
                    );
                    *worker = Some(handle);
                    return false;
                }
                thread::sleep(SHUTDOWN_POLL_INTERVAL);
            }

            if let Err(e) = handle.join() {
                eprintln!(
                    "[LOGGER ERROR] Dispatcher worker panicked during shutdown: {:?}",
                    e
                );
                clean = false;
            }
        }
        drop(worker);

        // A producer that passed the exit check can still push after the
        // final drain; such records are never delivered.
        while self.shared.queue.try_pop().is_some() {
            self.shared.metrics.record_dropped();
        }

        let sinks = std::mem::take(&mut *self.shared.sinks.lock());
        drop(sinks);

        let lost = self.shared.metrics.lost_count();
        if stopped_now && lost > 0 {
            eprintln!(
                "[LOGGER WARNING] Dispatcher shut down with {} lost logs (loss rate: {:.2}%)",
                lost,
                self.shared.metrics.loss_rate()
            );
        }

        clean
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
