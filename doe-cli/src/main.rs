//! DOE CLI
//!
//! Command-line interface for inspecting DOE jobs on the Rescale platform
//! and extracting results from solver logs.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "doe")]
#[command(about = "Rescale DOE job CLI", long_about = None)]
struct Cli {
    /// Rescale API base URL
    #[arg(
        long,
        env = "RESCALE_BASE_URL",
        default_value = doe_client::DEFAULT_BASE_URL
    )]
    base_url: String,

    /// Rescale API key
    #[arg(long, env = "RESCALE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Number of runs requested per listing
    #[arg(long, env = "DOE_RUNS_PAGE_SIZE", default_value_t = doe_client::DEFAULT_RUNS_PAGE_SIZE)]
    runs_page_size: u32,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
        api_key: cli.api_key,
        runs_page_size: cli.runs_page_size,
    };

    handle_command(cli.command, &config).await
}
