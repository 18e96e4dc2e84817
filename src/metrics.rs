use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    documents_summarized: AtomicU64,
    chunked_documents: AtomicU64,
    generation_calls: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed summary and the number of generation calls it required.
    pub fn record_summary(&self, generation_calls: u64, chunked: bool) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.generation_calls
            .fetch_add(generation_calls, Ordering::Relaxed);
        if chunked {
            self.chunked_documents.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            chunked_documents: self.chunked_documents.load(Ordering::Relaxed),
            generation_calls: self.generation_calls.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents summarized since startup.
    pub documents_summarized: u64,
    /// Number of documents that exceeded the direct threshold and were chunked.
    pub chunked_documents: u64,
    /// Total generation calls issued across all summaries.
    pub generation_calls: u64,
}
