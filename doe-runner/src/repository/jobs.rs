//! Jobs repository
//!
//! Handles communication with the platform while a job is monitored:
//! - Reading the latest job status
//! - Listing the job's runs
//! - Stopping the job

use anyhow::{Context, Result};
use async_trait::async_trait;
use doe_client::RescaleClient;
use doe_core::domain::run::RunSnapshot;
use std::sync::Arc;

/// Repository trait for monitoring a submitted job
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Fetches the most recent status label of a job
    ///
    /// Returns `None` when the job has no status history yet.
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    async fn fetch_status(&self, job_id: &str) -> Result<Option<String>>;

    /// Fetches a snapshot of the job's runs
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    async fn fetch_runs(&self, job_id: &str) -> Result<RunSnapshot>;

    /// Stops the job
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    async fn stop_job(&self, job_id: &str) -> Result<()>;
}

/// HTTP implementation of JobRepository
pub struct HttpJobRepository {
    client: Arc<RescaleClient>,
}

impl HttpJobRepository {
    /// Creates a new HTTP job repository
    ///
    /// # Arguments
    /// * `client` - Shared Rescale client
    pub fn new(client: Arc<RescaleClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobRepository for HttpJobRepository {
    async fn fetch_status(&self, job_id: &str) -> Result<Option<String>> {
        let statuses = self
            .client
            .get_job_statuses(job_id)
            .await
            .context("Failed to fetch job statuses")?;

        Ok(statuses.latest_status().map(str::to_string))
    }

    async fn fetch_runs(&self, job_id: &str) -> Result<RunSnapshot> {
        self.client
            .get_runs(job_id)
            .await
            .context("Failed to fetch job runs")
    }

    async fn stop_job(&self, job_id: &str) -> Result<()> {
        self.client
            .stop_job(job_id)
            .await
            .context("Failed to stop job")
    }
}
