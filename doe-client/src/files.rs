//! File-related API endpoints

use crate::RescaleClient;
use crate::error::{ClientError, Result};
use doe_core::domain::file::{CloudFile, FileType};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tracing::{debug, info};

impl RescaleClient {
    /// Upload a local file
    ///
    /// The file is sent as a multipart form with a `file` part and a `typeId`
    /// field; the content type and boundary are set by the form.
    ///
    /// # Arguments
    /// * `path` - Local file to upload
    /// * `file_type` - Role of the file in the job
    ///
    /// # Returns
    /// The stored file, whose `id` is referenced from job definitions
    pub async fn upload_file(&self, path: impl AsRef<Path>, file_type: FileType) -> Result<CloudFile> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let size = contents.len();
        let form = Form::new()
            .part("file", Part::bytes(contents).file_name(file_name.clone()))
            .text("typeId", file_type.type_id().to_string());

        let url = self.url("files/contents/");
        debug!("POST {}", url);
        let response = self.client.post(&url).multipart(form).send().await?;

        let file: CloudFile = self.handle_response(response).await?;
        info!("Uploaded {} ({} bytes) as file {}", file_name, size, file.id);

        Ok(file)
    }
}
