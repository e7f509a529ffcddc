use tracing::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Quote submission counters
#[derive(Debug, Default)]
pub struct SubmissionMetrics {
    pub attempts: AtomicU64,
    pub successes: AtomicU64,
    pub failures: AtomicU64,
    pub misconfigurations: AtomicU64,
    pub validation_rejections: AtomicU64,
    pub discarded_late: AtomicU64,
}

impl SubmissionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, misconfigured: bool) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        if misconfigured {
            self.misconfigurations.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_validation_rejection(&self) {
        self.validation_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discarded_late(&self) {
        self.discarded_late.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> SubmissionStats {
        SubmissionStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            misconfigurations: self.misconfigurations.load(Ordering::Relaxed),
            validation_rejections: self.validation_rejections.load(Ordering::Relaxed),
            discarded_late: self.discarded_late.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Submission metrics: attempts={}, successes={}, failures={}, misconfigured={}, rejected={}, discarded_late={}",
            stats.attempts,
            stats.successes,
            stats.failures,
            stats.misconfigurations,
            stats.validation_rejections,
            stats.discarded_late
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub misconfigurations: u64,
    pub validation_rejections: u64,
    pub discarded_late: u64,
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
