//! DOE runner binary
//!
//! Uploads the example job files, creates and submits the job, waits for it
//! to execute and complete enough runs, then stops it. Ctrl-C interrupts the
//! waits; the job is stopped either way.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doe_client::RescaleClient;
use doe_runner::config::Config;
use doe_runner::repository::{HttpJobRepository, JobRepository};
use doe_runner::scheduler::PollState;
use doe_runner::service::DoeWorkflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doe_runner=info,doe_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DOE runner");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: base_url={}, jobfiles_dir={}, threshold={}",
        config.base_url,
        config.jobfiles_dir.display(),
        config.completed_runs_threshold
    );

    // Initialize Rescale client
    let client = Arc::new(
        RescaleClient::new(config.client_config()).context("Failed to create Rescale client")?,
    );

    let me = client
        .get_me()
        .await
        .context("Failed to authenticate with Rescale")?;
    info!(
        "Authenticated as {}",
        me.email.as_deref().unwrap_or("unknown user")
    );

    info!(
        "Poll step: {:?}, executing timeout: {:?}, completion timeout: {:?}",
        config.poll_step, config.executing_timeout, config.poll_timeout
    );

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let repository: Arc<dyn JobRepository> = Arc::new(HttpJobRepository::new(Arc::clone(&client)));
    let workflow = DoeWorkflow::new(config, client, repository, cancel);

    match workflow.run().await {
        Ok(report) if report.state == PollState::Succeeded => {
            info!("Job {} reached its completed-runs threshold", report.job_id);
            Ok(())
        }
        Ok(report) => {
            warn!("Job {} stopped in state {:?}", report.job_id, report.state);
            anyhow::bail!("workflow ended in state {:?}", report.state)
        }
        Err(e) => {
            error!("Workflow error: {:#}", e);
            Err(e)
        }
    }
}

/// Loads configuration from environment variables and validates it
fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

/// Raises `cancel` on the first Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, stopping the workflow");
                cancel.cancel();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}
