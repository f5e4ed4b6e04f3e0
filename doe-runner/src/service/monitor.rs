//! Job monitor
//!
//! Runs the two waits of the DOE workflow on top of poll sessions:
//! - until the job reports the `EXECUTING` status
//! - until enough runs have completed

use doe_core::domain::job::EXECUTING;
use doe_core::domain::run::{RunSummary, summarize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::repository::JobRepository;
use crate::scheduler::{PollConfig, PollOutcome, PollSession};
use crate::service::summary_sink::SummarySink;

/// Watches one platform account's jobs through a repository
pub struct JobMonitor {
    repository: Arc<dyn JobRepository>,
    sink: Arc<dyn SummarySink>,
    step_interval: Duration,
    cancel: CancellationToken,
}

impl JobMonitor {
    /// Creates a new job monitor
    ///
    /// # Arguments
    /// * `repository` - Source of job statuses and run listings
    /// * `sink` - Receives the summary of every completion check
    /// * `step_interval` - Wait between two checks
    /// * `cancel` - Ends any wait in progress when cancelled
    pub fn new(
        repository: Arc<dyn JobRepository>,
        sink: Arc<dyn SummarySink>,
        step_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            repository,
            sink,
            step_interval,
            cancel,
        }
    }

    /// Waits until the job's latest status is `EXECUTING`
    ///
    /// The value carried by the outcome is the latest status label.
    pub async fn wait_until_executing(
        &self,
        job_id: &str,
        timeout: Duration,
    ) -> PollOutcome<Option<String>, anyhow::Error> {
        let repository = &self.repository;

        PollSession::new(format!("{job_id}/executing"), self.poll_config(timeout))
            .with_cancellation(self.cancel.clone())
            .run(
                move || async move { repository.fetch_status(job_id).await },
                |status: &Option<String>| {
                    status
                        .as_deref()
                        .is_some_and(|status| status.eq_ignore_ascii_case(EXECUTING))
                },
            )
            .await
    }

    /// Waits until at least `threshold` runs have completed
    ///
    /// Every check lists the runs afresh, summarizes them and hands the
    /// summary to the sink before evaluating the threshold.
    pub async fn wait_for_completed_runs(
        &self,
        job_id: &str,
        threshold: u64,
        timeout: Duration,
    ) -> PollOutcome<RunSummary, anyhow::Error> {
        let repository = &self.repository;
        let sink = &self.sink;

        PollSession::new(format!("{job_id}/completed-runs"), self.poll_config(timeout))
            .with_cancellation(self.cancel.clone())
            .run(
                move || async move {
                    let snapshot = repository.fetch_runs(job_id).await?;
                    let summary = summarize(&snapshot);
                    sink.record(job_id, &summary);
                    Ok::<_, anyhow::Error>(summary)
                },
                |summary: &RunSummary| summary.completed_runs >= threshold,
            )
            .await
    }

    fn poll_config(&self, timeout: Duration) -> PollConfig {
        PollConfig::new(self.step_interval, timeout)
    }
}
