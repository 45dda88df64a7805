use crate::prelude::SkipReason;
use serde::Serialize;
use std::sync::Mutex;

/// Frame-level accounting for one processor. Skips are steady-state for this
/// stream format, so they are counted here rather than reported as errors.
pub struct FrameMetrics {
    inner: Mutex<Counters>,
}

#[derive(Default, Clone, Copy)]
struct Counters {
    located: usize,
    emitted: usize,
    skipped_structural: usize,
    skipped_physical: usize,
}

/// Point-in-time copy of the counters, serializable into run summaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameMetricsSnapshot {
    pub located: usize,
    pub emitted: usize,
    pub skipped_structural: usize,
    pub skipped_physical: usize,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    pub fn record_located(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.located += 1;
        }
    }

    pub fn record_emitted(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.emitted += 1;
        }
    }

    pub fn record_skip(&self, reason: SkipReason) {
        if let Ok(mut counters) = self.inner.lock() {
            if reason.is_physical() {
                counters.skipped_physical += 1;
            } else {
                counters.skipped_structural += 1;
            }
        }
    }

    pub fn snapshot(&self) -> FrameMetricsSnapshot {
        match self.inner.lock() {
            Ok(counters) => FrameMetricsSnapshot {
                located: counters.located,
                emitted: counters.emitted,
                skipped_structural: counters.skipped_structural,
                skipped_physical: counters.skipped_physical,
            },
            Err(_) => FrameMetricsSnapshot::default(),
        }
    }
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
