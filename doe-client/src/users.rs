//! User-related API endpoints

use crate::RescaleClient;
use crate::error::Result;
use doe_core::domain::user::UserProfile;
use tracing::debug;

impl RescaleClient {
    /// Get the profile of the account owning the API key
    ///
    /// Useful as a cheap credentials check before starting a workflow.
    pub async fn get_me(&self) -> Result<UserProfile> {
        let url = self.url("users/me/");
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
