//! Counters and snapshots for registry activity

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of registry activity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Bindings currently held
    pub active_bindings: u64,
    /// Bindings created
    pub created: u64,
    /// Update calls applied (including creations)
    pub updated: u64,
    /// Bindings deleted
    pub deleted: u64,
    /// Resolutions that completed with a binding (fast path included)
    pub resolved: u64,
    /// Resolutions that hit their deadline
    pub timed_out: u64,
}

impl RegistryStats {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of finished resolutions that timed out
    pub fn timeout_ratio(&self) -> f64 {
        let finished = self.resolved + self.timed_out;
        if finished > 0 {
            self.timed_out as f64 / finished as f64
        } else {
            0.0
        }
    }
}

/// Live counters updated by the registry
#[derive(Debug, Default)]
pub(crate) struct RegistryCounters {
    pub created: AtomicU64,
    pub updated: AtomicU64,
    pub deleted: AtomicU64,
    pub resolved: AtomicU64,
    pub timed_out: AtomicU64,
}

impl RegistryCounters {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, active_bindings: usize) -> RegistryStats {
        RegistryStats {
            active_bindings: active_bindings as u64,
            created: self.created.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            resolved: self.resolved.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
        }
    }
}
