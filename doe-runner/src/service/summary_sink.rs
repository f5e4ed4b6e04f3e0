//! Run summary sink
//!
//! Receives the run summary computed on every completion check. The sink is
//! write-only: nothing it records feeds back into the polling decision.

use doe_core::domain::run::RunSummary;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Destination for per-check run summaries
pub trait SummarySink: Send + Sync {
    /// Records one summary
    ///
    /// # Arguments
    /// * `job_id` - The job the summary belongs to
    /// * `summary` - Counters of the latest snapshot
    fn record(&self, job_id: &str, summary: &RunSummary);
}

/// Writes each summary as a JSON log line
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSummarySink;

impl SummarySink for TracingSummarySink {
    fn record(&self, job_id: &str, summary: &RunSummary) {
        match serde_json::to_string(summary) {
            Ok(json) => info!("RUN SUMMARY [{}]: {}", job_id, json),
            Err(e) => warn!("Failed to serialize run summary for job {}: {}", job_id, e),
        }
    }
}

/// In-memory implementation of SummarySink
///
/// Uses Arc<Mutex<Vec<RunSummary>>> so clones share one history.
#[derive(Clone, Default)]
pub struct InMemorySummarySink {
    history: Arc<Mutex<Vec<RunSummary>>>,
}

impl InMemorySummarySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every summary recorded so far
    pub fn history(&self) -> Vec<RunSummary> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl SummarySink for InMemorySummarySink {
    fn record(&self, _job_id: &str, summary: &RunSummary) {
        if let Ok(mut history) = self.history.lock() {
            history.push(*summary);
        }
    }
}
