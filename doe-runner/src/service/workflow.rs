//! DOE workflow
//!
//! Drives one parametric job end to end:
//! 1. Upload the input, template, parameter and post-processing files
//! 2. Create and submit the job
//! 3. Wait for the job to start executing
//! 4. Wait for the completed-runs threshold
//! 5. Stop the job, whatever the outcome of the waits
//!
//! A poll session that fails on a fetch still stops the job before the
//! error is returned. A job that could not be stopped is reported as an
//! error whatever the outcome of the waits.

use anyhow::{Context, Result};
use doe_client::RescaleClient;
use doe_core::domain::file::FileType;
use doe_core::domain::run::RunSummary;
use doe_core::dto::job::{DoeInputs, JobDefinition};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::repository::JobRepository;
use crate::scheduler::{PollOutcome, PollState};
use crate::service::monitor::JobMonitor;
use crate::service::summary_sink::TracingSummarySink;

/// Input files of the airfoil study, relative to the job-files directory
const INPUT_ARCHIVE: &str = "airfoil2D_DOE.zip";
const VELOCITY_TEMPLATE: &str = "U.inp_template";
const PARAMETER_TABLE: &str = "openfoam.csv";
const POSTPROCESS_SCRIPT: &str = "extract.py";

/// How a workflow ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub job_id: String,
    /// Terminal state of the last poll session that ran
    pub state: PollState,
    /// Last run summary observed, if the completion wait got that far
    pub summary: Option<RunSummary>,
}

/// End-to-end driver for a DOE job
pub struct DoeWorkflow {
    config: Config,
    client: Arc<RescaleClient>,
    repository: Arc<dyn JobRepository>,
    monitor: JobMonitor,
}

impl DoeWorkflow {
    /// Creates a new workflow
    ///
    /// # Arguments
    /// * `config` - Runner configuration
    /// * `client` - Client used to upload files and create the job
    /// * `repository` - Source of statuses and runs while monitoring
    /// * `cancel` - Interrupts the waits; the job is still stopped
    pub fn new(
        config: Config,
        client: Arc<RescaleClient>,
        repository: Arc<dyn JobRepository>,
        cancel: CancellationToken,
    ) -> Self {
        let monitor = JobMonitor::new(
            Arc::clone(&repository),
            Arc::new(TracingSummarySink),
            config.poll_step,
            cancel,
        );

        Self {
            config,
            client,
            repository,
            monitor,
        }
    }

    /// Runs every step of the workflow
    pub async fn run(&self) -> Result<WorkflowReport> {
        let inputs = self.stage_inputs().await?;
        let job_id = self.launch(&inputs).await?;
        self.monitor_job(&job_id).await
    }

    /// Uploads the job's input files
    pub async fn stage_inputs(&self) -> Result<DoeInputs> {
        let dir = &self.config.jobfiles_dir;
        let client = &self.client;
        info!("Uploading input files from {}", dir.display());

        let upload = move |name: &'static str, file_type: FileType| async move {
            client
                .upload_file(dir.join(name), file_type)
                .await
                .map(|file| file.id)
                .with_context(|| format!("Failed to upload {}", name))
        };

        Ok(DoeInputs {
            input_file_id: upload(INPUT_ARCHIVE, FileType::Input).await?,
            template_file_id: upload(VELOCITY_TEMPLATE, FileType::Template).await?,
            param_file_id: upload(PARAMETER_TABLE, FileType::Parameters).await?,
            postproc_file_id: upload(POSTPROCESS_SCRIPT, FileType::Script).await?,
        })
    }

    /// Creates and submits the job, returning its ID
    pub async fn launch(&self, inputs: &DoeInputs) -> Result<String> {
        let definition = JobDefinition::openfoam_airfoil(inputs, &self.config.settings);

        let job = self
            .client
            .create_job(&definition)
            .await
            .context("Failed to create job")?;
        info!("Created job {} ({})", job.id, job.name.as_deref().unwrap_or("unnamed"));

        self.client
            .submit_job(&job.id)
            .await
            .context("Failed to submit job")?;
        info!("Submitted job {}", job.id);

        match self.client.get_job(&job.id).await {
            Ok(submitted) => info!(
                "Job {}: {}",
                submitted.id,
                serde_json::to_string(&submitted).unwrap_or_default()
            ),
            Err(e) => warn!("Failed to read back job {}: {}", job.id, e),
        }

        Ok(job.id)
    }

    /// Waits for the job to execute and complete enough runs, then stops it
    pub async fn monitor_job(&self, job_id: &str) -> Result<WorkflowReport> {
        let executing = self
            .monitor
            .wait_until_executing(job_id, self.config.executing_timeout)
            .await;

        if !executing.is_succeeded() {
            return self.conclude(job_id, executing.map(|_| None)).await;
        }
        info!("Job {} is now executing", job_id);

        match self.repository.fetch_runs(job_id).await {
            Ok(snapshot) => info!(
                "Job {} lists {} of {} expected run(s)",
                job_id,
                snapshot.results.len(),
                snapshot.expected_count
            ),
            Err(e) => warn!("Failed to list runs of job {}: {:#}", job_id, e),
        }

        let completed = self
            .monitor
            .wait_for_completed_runs(
                job_id,
                self.config.completed_runs_threshold,
                self.config.poll_timeout,
            )
            .await;

        self.conclude(job_id, completed.map(Some)).await
    }

    /// Stops the job and turns the last poll outcome into the workflow result
    async fn conclude(
        &self,
        job_id: &str,
        outcome: PollOutcome<Option<RunSummary>, anyhow::Error>,
    ) -> Result<WorkflowReport> {
        let state = outcome.state();
        let summary = outcome.last().copied().flatten();

        match &summary {
            Some(summary) => info!(
                "Job {} finished polling in state {:?} after {} check(s), last summary: {:?}",
                job_id,
                state,
                outcome.attempts(),
                summary
            ),
            None => info!(
                "Job {} finished polling in state {:?} after {} check(s)",
                job_id,
                state,
                outcome.attempts()
            ),
        }

        info!("Stopping job {}", job_id);
        let stopped = self.repository.stop_job(job_id).await;
        if let Err(e) = &stopped {
            error!("Failed to stop job {}: {:#}", job_id, e);
        }

        match self.repository.fetch_status(job_id).await {
            Ok(status) => info!(
                "Job {} status after stop: {}",
                job_id,
                status.as_deref().unwrap_or("unknown")
            ),
            Err(e) => warn!("Failed to read status of job {}: {:#}", job_id, e),
        }

        if let PollOutcome::Failed { error, .. } = outcome {
            return Err(error.context(format!("Monitoring job {} failed", job_id)));
        }

        stopped.with_context(|| format!("Failed to stop job {}", job_id))?;

        Ok(WorkflowReport {
            job_id: job_id.to_string(),
            state,
            summary,
        })
    }
}
