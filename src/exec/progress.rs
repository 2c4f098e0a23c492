use std::sync::atomic::{AtomicU64, Ordering};

/// Receiver of per-partition completion events.
///
/// Called from worker threads; implementations must be thread-safe. Events are
/// fire-and-forget and never influence the composited result.
pub trait ProgressSink: Sync {
    /// Called once per invocation, before any partition runs.
    fn begin(&self, _total: usize) {}

    /// Called once after each partition finishes compositing.
    fn partition_completed(&self);
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn partition_completed(&self) {}
}

impl<F: Fn() + Sync> ProgressSink for F {
    fn partition_completed(&self) {
        self()
    }
}

/// Atomic counter of completed partitions.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    total: AtomicU64,
    completed: AtomicU64,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Completed share in `[0, 1]`; `1.0` when nothing was scheduled.
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 1.0;
        }
        (self.completed() as f64 / total as f64).clamp(0.0, 1.0)
    }
}

impl ProgressSink for ProgressCounter {
    fn begin(&self, total: usize) {
        self.total.store(total as u64, Ordering::Relaxed);
        self.completed.store(0, Ordering::Relaxed);
    }

    fn partition_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exec/progress.rs"]
mod tests;
