use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing brief and search activity.
#[derive(Default)]
pub struct BriefMetrics {
    briefs_generated: AtomicU64,
    files_indexed: AtomicU64,
    searches_served: AtomicU64,
}

impl BriefMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed brief and the number of files indexed for it.
    pub fn record_brief(&self, file_count: u64) {
        self.briefs_generated.fetch_add(1, Ordering::Relaxed);
        self.files_indexed.fetch_add(file_count, Ordering::Relaxed);
    }

    /// Record a completed search request.
    pub fn record_search(&self) {
        self.searches_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            briefs_generated: self.briefs_generated.load(Ordering::Relaxed),
            files_indexed: self.files_indexed.load(Ordering::Relaxed),
            searches_served: self.searches_served.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of activity counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of briefs generated since startup.
    pub briefs_generated: u64,
    /// Total files uploaded and indexed across all briefs.
    pub files_indexed: u64,
    /// Number of search requests answered since startup.
    pub searches_served: u64,
}
