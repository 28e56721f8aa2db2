use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Poll loop counters.
#[derive(Debug, Default)]
pub struct PollStats {
    cycles: AtomicU64,
    skipped: AtomicU64,
    fallbacks: AtomicU64,
    errors: AtomicU64,
    discarded: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollStatsSnapshot {
    pub cycles: u64,
    pub skipped: u64,
    pub fallbacks: u64,
    pub errors: u64,
    pub discarded: u64,
}

impl PollStats {
    pub fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PollStatsSnapshot {
        PollStatsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}
