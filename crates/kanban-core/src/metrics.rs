//! Global atomic counters for board and hand-off activity.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. when a driver finishes a session).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Process-wide counters, shared by every session.
pub struct Metrics {
    tasks_created: AtomicU64,
    tasks_claimed: AtomicU64,
    tasks_completed: AtomicU64,
    rejected: AtomicU64,
    handoffs: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            tasks_created: AtomicU64::new(0),
            tasks_claimed: AtomicU64::new(0),
            tasks_completed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            handoffs: AtomicU64::new(0),
        }
    }

    pub fn inc_tasks_created(&self) {
        self.tasks_created.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "tasks_created", "counter incremented");
    }

    pub fn inc_tasks_claimed(&self) {
        self.tasks_claimed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "tasks_claimed", "counter incremented");
    }

    pub fn inc_tasks_completed(&self) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "tasks_completed", "counter incremented");
    }

    /// A claim or completion that left the board unchanged.
    pub fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "rejected", "counter incremented");
    }

    pub fn inc_handoffs(&self) {
        self.handoffs.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "handoffs", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            tasks_created = self.tasks_created(),
            tasks_claimed = self.tasks_claimed(),
            tasks_completed = self.tasks_completed(),
            rejected = self.rejected(),
            handoffs = self.handoffs(),
        );
    }

    pub fn tasks_created(&self) -> u64 {
        self.tasks_created.load(Ordering::Relaxed)
    }

    pub fn tasks_claimed(&self) -> u64 {
        self.tasks_claimed.load(Ordering::Relaxed)
    }

    pub fn tasks_completed(&self) -> u64 {
        self.tasks_completed.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn handoffs(&self) -> u64 {
        self.handoffs.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.tasks_created.store(0, Ordering::Relaxed);
        self.tasks_claimed.store(0, Ordering::Relaxed);
        self.tasks_completed.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.handoffs.store(0, Ordering::Relaxed);
    }
}
