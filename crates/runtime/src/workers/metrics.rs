//! Arena metrics and statistics.
//!
//! Tracks battle throughput, failures, and concurrency.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Battle metrics shared by all workers of an arena.
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct ArenaMetrics {
    /// Battles that produced a report
    completed: AtomicU64,

    /// Battles rejected at setup or lost to a worker failure
    failed: AtomicU64,

    /// Battles abandoned after the timeout
    timed_out: AtomicU64,

    /// Battles currently computing
    in_flight: AtomicU64,

    /// Peak number of battles computing at once
    peak_in_flight: AtomicU64,

    /// Rounds played across all completed battles
    total_rounds: AtomicU64,

    /// Compute time across all completed battles, in nanoseconds
    total_compute_nanos: AtomicU64,
}

impl ArenaMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&self) {
        let depth = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;

        let mut current_peak = self.peak_in_flight.load(Ordering::Relaxed);
        while depth > current_peak {
            match self.peak_in_flight.compare_exchange_weak(
                current_peak,
                depth,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current_peak = actual,
            }
        }
    }

    pub(crate) fn record_end(&self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn record_success(&self, rounds: u32, elapsed: Duration) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.total_rounds
            .fetch_add(u64::from(rounds), Ordering::Relaxed);
        self.total_compute_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timeout(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn timed_out(&self) -> u64 {
        self.timed_out.load(Ordering::Relaxed)
    }

    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn peak_in_flight(&self) -> u64 {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Average rounds per completed battle.
    pub fn avg_rounds(&self) -> f64 {
        let completed = self.completed();
        if completed == 0 {
            0.0
        } else {
            self.total_rounds.load(Ordering::Relaxed) as f64 / completed as f64
        }
    }

    /// Average compute time per completed battle.
    pub fn avg_compute_time(&self) -> Duration {
        let completed = self.completed();
        if completed == 0 {
            Duration::ZERO
        } else {
            let total_nanos = self.total_compute_nanos.load(Ordering::Relaxed);
            Duration::from_nanos(total_nanos / completed)
        }
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Individual fields are read atomically; the snapshot as a whole may be
    /// inconsistent while battles are running.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            completed: self.completed(),
            failed: self.failed(),
            timed_out: self.timed_out(),
            in_flight: self.in_flight(),
            peak_in_flight: self.peak_in_flight(),
            avg_rounds: self.avg_rounds(),
            avg_compute_time: self.avg_compute_time(),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub completed: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub in_flight: u64,
    pub peak_in_flight: u64,
    pub avg_rounds: f64,
    pub avg_compute_time: Duration,
}
