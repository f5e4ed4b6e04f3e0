//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod extract;
mod file;
mod job;

pub use file::FileCommands;
pub use job::JobCommands;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the account the API key belongs to
    Whoami,
    /// Job inspection and control
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// File uploads
    File {
        #[command(subcommand)]
        command: FileCommands,
    },
    /// Extract labelled values from a solver log
    Extract {
        /// Log file to scan
        log: PathBuf,

        /// Labels to look up, e.g. Cd Cl
        #[arg(required = true)]
        labels: Vec<String>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Whoami => whoami(config).await,
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::File { command } => file::handle_file_command(command, config).await,
        Commands::Extract { log, labels } => extract::extract_values(&log, &labels),
    }
}

async fn whoami(config: &Config) -> Result<()> {
    let client = config.client()?;
    let me = client.get_me().await?;

    let name = [me.first_name.as_deref(), me.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    println!("{}", "Account:".bold());
    println!("  Email: {}", me.email.as_deref().unwrap_or("-").cyan());
    if !name.is_empty() {
        println!("  Name:  {}", name);
    }
    println!("  API:   {}", client.base_url().dimmed());

    Ok(())
}
