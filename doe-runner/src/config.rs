//! Runner configuration
//!
//! Defines all configurable parameters for a DOE run: platform credentials,
//! job sizing, input file location, and the timing of both poll sessions.

use doe_client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_RUNS_PAGE_SIZE};
use doe_core::dto::job::DoeSettings;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Runner configuration
///
/// Intervals and thresholds are configurable so a small test job can be
/// driven with short timeouts and the full study with the defaults.
#[derive(Clone)]
pub struct Config {
    /// Rescale API key
    pub api_key: String,

    /// Rescale API base URL (e.g., "https://eu.rescale.com/api/v2/")
    pub base_url: String,

    /// Directory holding the job's input files
    pub jobfiles_dir: PathBuf,

    /// Slots and walltime of the job
    pub settings: DoeSettings,

    /// Interval between two checks of either poll session
    pub poll_step: Duration,

    /// How long to wait for the job to start executing
    pub executing_timeout: Duration,

    /// How long to wait for the completed-runs threshold
    pub poll_timeout: Duration,

    /// Number of completed runs after which the job is stopped
    pub completed_runs_threshold: u64,

    /// `page_size` requested when listing runs
    pub runs_page_size: u32,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            jobfiles_dir: PathBuf::from("doe-example-jobfiles"),
            settings: DoeSettings::default(),
            poll_step: Duration::from_secs(30),
            executing_timeout: Duration::from_secs(1200), // 20 minutes
            poll_timeout: Duration::from_secs(3600),
            completed_runs_threshold: 1848,
            runs_page_size: DEFAULT_RUNS_PAGE_SIZE,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - RESCALE_API_KEY (required)
    /// - RESCALE_BASE_URL (optional, default: https://eu.rescale.com/api/v2/)
    /// - DOE_JOBFILES_DIR (optional, default: doe-example-jobfiles)
    /// - DOE_SLOTS (optional, default: 1500)
    /// - DOE_WALLTIME_HOURS (optional, default: 10)
    /// - DOE_POLL_STEP (optional, seconds, default: 30)
    /// - DOE_EXECUTING_TIMEOUT (optional, seconds, default: 1200)
    /// - DOE_POLL_TIMEOUT (optional, seconds, default: 3600)
    /// - DOE_COMPLETED_RUNS_THRESHOLD (optional, default: 1848)
    /// - DOE_RUNS_PAGE_SIZE (optional, default: 1848)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_key = lookup("RESCALE_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("RESCALE_API_KEY environment variable not set"))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup("RESCALE_BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(dir) = lookup("DOE_JOBFILES_DIR") {
            config.jobfiles_dir = PathBuf::from(dir);
        }

        let parsed = |name: &str| lookup(name).and_then(|s| s.trim().parse::<u64>().ok());

        if let Some(slots) = parsed("DOE_SLOTS").and_then(|n| u32::try_from(n).ok()) {
            config.settings.slots = slots;
        }

        if let Some(hours) = parsed("DOE_WALLTIME_HOURS").and_then(|n| u32::try_from(n).ok()) {
            config.settings.walltime_hours = hours;
        }

        if let Some(secs) = parsed("DOE_POLL_STEP") {
            config.poll_step = Duration::from_secs(secs);
        }

        if let Some(secs) = parsed("DOE_EXECUTING_TIMEOUT") {
            config.executing_timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = parsed("DOE_POLL_TIMEOUT") {
            config.poll_timeout = Duration::from_secs(secs);
        }

        if let Some(threshold) = parsed("DOE_COMPLETED_RUNS_THRESHOLD") {
            config.completed_runs_threshold = threshold;
        }

        if let Some(page_size) = parsed("DOE_RUNS_PAGE_SIZE").and_then(|n| u32::try_from(n).ok()) {
            config.runs_page_size = page_size;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("api_key cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.settings.slots == 0 {
            anyhow::bail!("slots must be greater than 0");
        }

        if self.poll_step.is_zero() {
            anyhow::bail!("poll_step must be greater than 0");
        }

        if self.runs_page_size == 0 {
            anyhow::bail!("runs_page_size must be greater than 0");
        }

        Ok(())
    }

    /// Connection settings for the Rescale client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_runs_page_size(self.runs_page_size)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("jobfiles_dir", &self.jobfiles_dir)
            .field("settings", &self.settings)
            .field("poll_step", &self.poll_step)
            .field("executing_timeout", &self.executing_timeout)
            .field("poll_timeout", &self.poll_timeout)
            .field("completed_runs_threshold", &self.completed_runs_threshold)
            .field("runs_page_size", &self.runs_page_size)
            .finish()
    }
}
