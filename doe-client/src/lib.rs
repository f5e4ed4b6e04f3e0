//! Rescale HTTP Client
//!
//! A small, type-safe HTTP client for the Rescale REST API (v2).
//!
//! The client covers exactly what the DOE workflow needs: uploading input
//! files, creating and submitting a job, reading its status history and run
//! listing, and stopping it. Configuration is passed in explicitly; the
//! client never reads the environment.
//!
//! # Example
//!
//! ```no_run
//! use doe_client::{ClientConfig, RescaleClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RescaleClient::new(ClientConfig::new("my-api-key"))?;
//!
//!     let runs = client.get_runs("Qanyhb").await?;
//!     println!("{} runs expected", runs.expected_count);
//!     Ok(())
//! }
//! ```

pub mod error;
mod files;
mod jobs;
mod users;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://eu.rescale.com/api/v2/";

/// Largest page the runs listing is asked for
pub const DEFAULT_RUNS_PAGE_SIZE: u32 = 1848;

/// Connection settings for [`RescaleClient`]
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://eu.rescale.com/api/v2/")
    pub base_url: String,
    /// API key sent as `Authorization: Token <key>`
    pub api_key: String,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Time allowed for a whole request, including reading the body
    pub request_timeout: Duration,
    /// `page_size` requested when listing runs
    pub runs_page_size: u32,
}

impl ClientConfig {
    /// Creates a configuration for the default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            runs_page_size: DEFAULT_RUNS_PAGE_SIZE,
        }
    }

    /// Overrides the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the runs page size
    pub fn with_runs_page_size(mut self, page_size: u32) -> Self {
        self.runs_page_size = page_size;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("runs_page_size", &self.runs_page_size)
            .finish()
    }
}

/// HTTP client for the Rescale API
///
/// Endpoints are grouped by resource:
/// - Jobs: create, submit, stop, status history, run listing
/// - Files: multipart upload
/// - Users: the profile owning the API key
#[derive(Debug, Clone)]
pub struct RescaleClient {
    /// Base URL without trailing slash
    base_url: String,
    /// Page size for run listings
    runs_page_size: u32,
    /// HTTP client instance, carrying the authorization header
    client: Client,
}

impl RescaleClient {
    /// Create a new Rescale client
    ///
    /// # Arguments
    /// * `config` - Endpoint, credentials and timeouts
    ///
    /// # Errors
    /// Fails when the API key is empty or not a valid header value, or when
    /// the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::InvalidConfig("API key is empty".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Token {}", config.api_key))
            .map_err(|_| ClientError::InvalidConfig("API key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        tracing::info!("Configured with base_url {}", config.base_url);

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            runs_page_size: config.runs_page_size,
            client,
        })
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins an API path (with its trailing slash) onto the base URL
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is ignored (e.g., submit and stop)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
