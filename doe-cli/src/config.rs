//! Configuration module
//!
//! Handles CLI configuration: API endpoint and credentials.

use anyhow::{Context, Result};
use doe_client::{ClientConfig, RescaleClient};

/// CLI configuration
#[derive(Clone)]
pub struct Config {
    /// Rescale API base URL
    pub base_url: String,
    /// Rescale API key; only platform commands need it
    pub api_key: Option<String>,
    /// `page_size` requested when listing runs
    pub runs_page_size: u32,
}

impl Config {
    /// Builds a client, failing when no API key was given
    pub fn client(&self) -> Result<RescaleClient> {
        let api_key = self
            .api_key
            .clone()
            .context("No API key: pass --api-key or set RESCALE_API_KEY")?;

        let client_config = ClientConfig::new(api_key)
            .with_base_url(self.base_url.clone())
            .with_runs_page_size(self.runs_page_size);

        RescaleClient::new(client_config).context("Failed to create Rescale client")
    }
}
