//! Job command handlers
//!
//! Handles job inspection (details, status history, run progress) and
//! the submit/stop controls.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use doe_client::RescaleClient;
use doe_core::domain::job::{EXECUTING, Job, JobStatusEntry};
use doe_core::domain::run::{RunRecord, RunState, RunSummary, summarize};

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Get job details
    Get {
        /// Job ID
        id: String,
    },
    /// Show the job's status history
    Status {
        /// Job ID
        id: String,
    },
    /// Summarize the job's runs
    Runs {
        /// Job ID
        id: String,

        /// Also list every run with its state
        #[arg(short, long)]
        list: bool,
    },
    /// Submit a saved job
    Submit {
        /// Job ID
        id: String,
    },
    /// Stop a job
    Stop {
        /// Job ID
        id: String,
    },
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        JobCommands::Get { id } => get_job(&client, &id).await,
        JobCommands::Status { id } => get_statuses(&client, &id).await,
        JobCommands::Runs { id, list } => get_runs(&client, &id, list).await,
        JobCommands::Submit { id } => {
            client.submit_job(&id).await?;
            println!("{} Submitted job {}", "✓".green(), id.cyan());
            Ok(())
        }
        JobCommands::Stop { id } => {
            client.stop_job(&id).await?;
            println!("{} Stop requested for job {}", "✓".green(), id.cyan());
            Ok(())
        }
    }
}

/// Get and display a single job
async fn get_job(client: &RescaleClient, id: &str) -> Result<()> {
    let job = client.get_job(id).await?;
    print_job_details(&job);
    Ok(())
}

/// Display the status history, most recent first
async fn get_statuses(client: &RescaleClient, id: &str) -> Result<()> {
    let page = client.get_job_statuses(id).await?;

    if page.results.is_empty() {
        println!("{}", format!("No statuses recorded for job {}.", id).yellow());
        return Ok(());
    }

    println!("{}", format!("Status history of job {}:", id).bold());
    for entry in &page.results {
        print_status_entry(entry);
    }

    Ok(())
}

/// Fetch one runs listing and display its summary
async fn get_runs(client: &RescaleClient, id: &str, list: bool) -> Result<()> {
    let snapshot = client.get_runs(id).await?;
    let summary = summarize(&snapshot);

    print_run_summary(id, &summary);

    if list && !snapshot.results.is_empty() {
        println!("\n{}", "Runs:".bold());
        for (index, run) in snapshot.results.iter().enumerate() {
            print_run(index, run);
        }
    }

    Ok(())
}

/// Print detailed job information
fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:    {}", job.id.cyan());
    if let Some(name) = &job.name {
        println!("  Name:  {}", name);
    }

    if !job.extra.is_empty() {
        println!("\n{}", "Definition:".bold());
        if let Ok(pretty) = serde_json::to_string_pretty(&job.extra) {
            println!("{}", pretty);
        } else {
            println!("{:?}", job.extra);
        }
    }
}

fn print_status_entry(entry: &JobStatusEntry) {
    let status = entry.status.as_deref().unwrap_or("Unknown");
    let date = entry.status_date.as_deref().unwrap_or("-");

    print!("  {} {}", date.dimmed(), colorize_status(status));
    match &entry.status_reason {
        Some(reason) if !reason.is_empty() => println!(" ({})", reason),
        _ => println!(),
    }
}

fn print_run_summary(id: &str, summary: &RunSummary) {
    println!("{}", format!("Runs of job {}:", id).bold());
    println!("  Expected:  {}", summary.expected_runs);
    println!("  Completed: {}", summary.completed_runs.to_string().green());
    println!("  Executing: {}", summary.executing_runs.to_string().cyan());

    let pending = summary.pending_runs.to_string();
    if summary.pending_runs < 0 {
        println!("  Pending:   {}", pending.red());
    } else {
        println!("  Pending:   {}", pending.yellow());
    }
}

fn print_run(index: usize, run: &RunRecord) {
    let id = run
        .id
        .as_ref()
        .map(display_run_id)
        .unwrap_or_else(|| format!("#{}", index + 1));

    let state = colorize_run_state(run.state());
    let started = run
        .started_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();

    println!("  {} {:<10} {} {}", "▸".cyan(), id.dimmed(), state, started.dimmed());
}

/// Run ids may be strings or numbers on the wire; strings print unquoted
fn display_run_id(id: &serde_json::Value) -> String {
    id.as_str()
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string())
}

/// Colorize a platform status label for display
fn colorize_status(status: &str) -> colored::ColoredString {
    match status.to_ascii_uppercase().as_str() {
        "PENDING" | "QUEUED" | "VALIDATED" | "STARTED" => status.yellow(),
        s if s == EXECUTING => status.cyan(),
        "COMPLETED" => status.green(),
        "STOPPING" => status.red(),
        _ => status.normal(),
    }
}

fn colorize_run_state(state: RunState) -> colored::ColoredString {
    let state_str = format!("{:?}", state);
    match state {
        RunState::Pending => state_str.yellow(),
        RunState::Running => state_str.cyan(),
        RunState::Completed => state_str.green(),
    }
}
