//! Job-related API endpoints

use crate::RescaleClient;
use crate::error::Result;
use doe_core::domain::job::{Job, JobStatusPage};
use doe_core::domain::run::RunSnapshot;
use doe_core::dto::job::JobDefinition;
use tracing::debug;

impl RescaleClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Create a new job
    ///
    /// The job is saved but not started; see [`RescaleClient::submit_job`].
    ///
    /// # Arguments
    /// * `definition` - The job definition
    ///
    /// # Returns
    /// The created job
    ///
    /// # Example
    /// ```no_run
    /// # use doe_client::{ClientConfig, RescaleClient};
    /// # use doe_core::dto::job::{DoeInputs, DoeSettings, JobDefinition};
    /// # async fn example(inputs: DoeInputs) -> Result<(), Box<dyn std::error::Error>> {
    /// let client = RescaleClient::new(ClientConfig::new("my-api-key"))?;
    /// let definition = JobDefinition::openfoam_airfoil(&inputs, &DoeSettings::default());
    /// let job = client.create_job(&definition).await?;
    /// client.submit_job(&job.id).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_job(&self, definition: &JobDefinition) -> Result<Job> {
        let url = self.url("jobs/");
        debug!("POST {}", url);
        let response = self.client.post(&url).json(definition).send().await?;

        self.handle_response(response).await
    }

    /// Submit a created job for execution
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    pub async fn submit_job(&self, job_id: &str) -> Result<()> {
        let url = self.url(&format!("jobs/{}/submit/", job_id));
        debug!("POST {}", url);
        let response = self.client.post(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Stop a job, terminating any runs still executing
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    pub async fn stop_job(&self, job_id: &str) -> Result<()> {
        let url = self.url(&format!("jobs/{}/stop/", job_id));
        debug!("POST {}", url);
        let response = self.client.post(&url).send().await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Job Query
    // =============================================================================

    /// Get a job by ID
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    ///
    /// # Returns
    /// The job details
    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        let url = self.url(&format!("jobs/{}/", job_id));
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the status history of a job, most recent first
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    pub async fn get_job_statuses(&self, job_id: &str) -> Result<JobStatusPage> {
        let url = self.url(&format!("jobs/{}/statuses/", job_id));
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Check whether the job's latest status is `EXECUTING`
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    pub async fn is_job_executing(&self, job_id: &str) -> Result<bool> {
        let statuses = self.get_job_statuses(job_id).await?;
        Ok(statuses.is_executing())
    }

    /// List the runs of a job
    ///
    /// A single page of `runs_page_size` runs is requested; the snapshot's
    /// `expected_count` carries the platform's total either way.
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    ///
    /// # Returns
    /// A snapshot of the job's runs
    pub async fn get_runs(&self, job_id: &str) -> Result<RunSnapshot> {
        let url = self.url(&format!("jobs/{}/runs/", job_id));
        debug!("GET {} (page_size={})", url, self.runs_page_size);
        let response = self
            .client
            .get(&url)
            .query(&[("page_size", self.runs_page_size)])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
