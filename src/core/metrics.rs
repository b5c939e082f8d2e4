//! Logger metrics for observability
//!
//! Counters for written records, failed writes and emitted diagnostics.
//! A logger and every logger derived from it share one instance.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_logger_facade::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_failed();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records the core accepted
    records_written: AtomicU64,

    /// Records lost to encode or sink failures
    write_failures: AtomicU64,

    /// Diagnostic records emitted for malformed call-site arguments
    diagnostics: AtomicU64,

    /// Failed sync calls
    sync_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            diagnostics: AtomicU64::new(0),
            sync_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn diagnostics(&self) -> u64 {
        self.diagnostics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sync_failures(&self) -> u64 {
        self.sync_failures.load(Ordering::Relaxed)
    }

    /// Record a successfully written record, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_diagnostic(&self) -> u64 {
        self.diagnostics.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sync_failure(&self) -> u64 {
        self.sync_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of attempted writes that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.records_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.diagnostics.store(0, Ordering::Relaxed);
        self.sync_failures.store(0, Ordering::Relaxed);
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
            records_written: AtomicU64::new(self.records_written()),
            write_failures: AtomicU64::new(self.write_failures()),
            diagnostics: AtomicU64::new(self.diagnostics()),
            sync_failures: AtomicU64::new(self.sync_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.records_written(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.diagnostics(), 0);
        assert_eq!(metrics.sync_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_diagnostic(), 0);
        assert_eq!(metrics.record_diagnostic(), 1);
        assert_eq!(metrics.diagnostics(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..10 {
            metrics.record_failed();
        }
        let rate = metrics.failure_rate();
        assert!((rate - 10.0).abs() < 1e-9, "Failure rate was {}", rate);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let metrics = LoggerMetrics::new();
        metrics.record_written();

        let snapshot = metrics.clone();
        metrics.record_written();
        metrics.record_sync_failure();

        assert_eq!(snapshot.records_written(), 1);
        assert_eq!(metrics.records_written(), 2);

        metrics.reset();
        assert_eq!(metrics.records_written(), 0);
        assert_eq!(metrics.sync_failures(), 0);
    }
}
