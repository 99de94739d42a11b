//! Delivery metrics for handlers and outputs
//!
//! Components that swallow sink errors (the text handler, the buffered
//! output's worker) count them here instead of propagating them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Emit a stderr alert on the first failure and every 1000th after it
const ALERT_EVERY: u64 = 1000;

/// Delivery counters
///
/// # Example
///
/// ```
/// use hierlog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_delivered();
/// metrics.record_failed();
///
/// assert_eq!(metrics.delivered(), 1);
/// assert_eq!(metrics.failed(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Messages handed to the sink successfully
    delivered: AtomicU64,

    /// Messages the sink rejected
    failed: AtomicU64,

    /// Events whose template failed and were replaced by a diagnostic
    render_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            render_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn render_failures(&self) -> u64 {
        self.render_failures.load(Ordering::Relaxed)
    }

    /// Record a delivered message, returning the previous count
    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed delivery, returning the previous count
    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a render failure, returning the previous count
    #[inline]
    pub fn record_render_failure(&self) -> u64 {
        self.render_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed delivery and report it on stderr when it is due
    pub(crate) fn alert_failed(&self, component: &str, error: &dyn std::fmt::Display) {
        let previous = self.record_failed();
        if previous == 0 || (previous + 1) % ALERT_EVERY == 0 {
            eprintln!(
                "[LOGGER ERROR] {} failed to deliver a message ({} failures so far): {}",
                component,
                previous + 1,
                error
            );
        }
    }

    /// Failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been attempted.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = self.delivered() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.render_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered()),
            failed: AtomicU64::new(self.failed()),
            render_failures: AtomicU64::new(self.render_failures()),
        }
    }
}
