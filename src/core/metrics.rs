//! Dispatcher metrics for observability
//!
//! Counters for submissions, overflow losses, deliveries and sink failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatcher observability
///
/// # Example
///
/// ```
/// use log_dispatch::DispatcherMetrics;
///
/// let metrics = DispatcherMetrics::new();
///
/// metrics.record_submitted();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.submitted_count(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// ```
#[derive(Debug)]
pub struct DispatcherMetrics {
    /// Records handed to `submit`
    submitted: AtomicU64,

    /// Records discarded because the queue was full or shutting down
    dropped: AtomicU64,

    /// Queued records evicted to make room for newer ones
    evicted: AtomicU64,

    /// Records taken off the queue and fanned out to sinks
    delivered: AtomicU64,

    /// Sink writes or flushes that returned an error or panicked
    sink_errors: AtomicU64,
}

impl DispatcherMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn submitted_count(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn evicted_count(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_error_count(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    /// Record a submission; returns the previous count
    #[inline]
    pub fn record_submitted(&self) -> u64 {
        self.submitted.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a dropped record; returns the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Record an evicted record; returns the previous count
    #[inline]
    pub fn record_evicted(&self) -> u64 {
        self.evicted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Records lost to overflow (dropped plus evicted)
    pub fn lost_count(&self) -> u64 {
        self.dropped_count() + self.evicted_count()
    }

    /// Loss rate as a percentage of submissions (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been submitted.
    pub fn loss_rate(&self) -> f64 {
        let submitted = self.submitted_count() as f64;
        if submitted == 0.0 {
            0.0
        } else {
            (self.lost_count() as f64 / submitted) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.submitted.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.evicted.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatcherMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatcherMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            submitted: AtomicU64::new(self.submitted_count()),
            dropped: AtomicU64::new(self.dropped_count()),
            evicted: AtomicU64::new(self.evicted_count()),
            delivered: AtomicU64::new(self.delivered_count()),
            sink_errors: AtomicU64::new(self.sink_error_count()),
        }
    }
}
