use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub struct Metrics {
    total_requests: AtomicUsize,
    documents_produced: AtomicUsize,
    runs_failed: AtomicUsize,
    observables_skipped: AtomicUsize,
    total_transform_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            documents_produced: AtomicUsize::new(0),
            runs_failed: AtomicUsize::new(0),
            observables_skipped: AtomicUsize::new(0),
            total_transform_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_run(&self, produced: bool, skipped: usize) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if produced {
            self.documents_produced.fetch_add(1, Ordering::Relaxed);
        } else {
            self.runs_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.observables_skipped.fetch_add(skipped, Ordering::Relaxed);
    }

    pub fn record_transform_time(&self, duration: std::time::Duration) {
        self.total_transform_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let produced = self.documents_produced.load(Ordering::Relaxed);
        let total_us = self.total_transform_time_us.load(Ordering::Relaxed) as f64;
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            documents_produced: produced,
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            observables_skipped: self.observables_skipped.load(Ordering::Relaxed),
            avg_transform_time_ms: if produced > 0 {
                total_us / produced as f64 / 1000.0
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub documents_produced: usize,
    pub runs_failed: usize,
    pub observables_skipped: usize,
    pub avg_transform_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts_runs() {
        let metrics = Metrics::new();
        metrics.record_run(true, 2);
        metrics.record_run(false, 0);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.documents_produced, 1);
        assert_eq!(snapshot.runs_failed, 1);
        assert_eq!(snapshot.observables_skipped, 2);
    }
}
