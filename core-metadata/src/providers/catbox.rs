//! catbox.moe Upload Client
//!
//! Anonymous uploads to catbox.moe through its user API.
//!
//! ## API Endpoint
//!
//! - **Upload**: `POST https://catbox.moe/user/api.php` with a
//!   `multipart/form-data` body: `reqtype=fileupload` and the image in the
//!   `fileToUpload` file field. The response body is the file URL as plain
//!   text.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::providers::CatboxUploader;
//! use std::time::Duration;
//!
//! let uploader = CatboxUploader::new(
//!     http_client,
//!     "https://catbox.moe/user/api.php",
//!     Duration::from_secs(30),
//! );
//! let url = uploader.upload(image_bytes).await?;
//! ```

use crate::artwork::{detect_image_type, ArtworkUploader};
use crate::error::{MetadataError, Result};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, MultipartForm};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const REQTYPE_FIELD: &str = "reqtype";
const REQTYPE_UPLOAD: &str = "fileupload";
const FILE_FIELD: &str = "fileToUpload";
const FILE_STEM: &str = "artwork";

/// catbox.moe uploader
pub struct CatboxUploader {
    http_client: Arc<dyn HttpClient>,
    upload_url: String,
    timeout: Duration,
}

impl CatboxUploader {
    /// Creates a new uploader
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `upload_url` - Endpoint accepting the multipart upload
    /// * `timeout` - Overall timeout for one upload
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        upload_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            upload_url: upload_url.into(),
            timeout,
        }
    }

    fn build_request(&self, data: Bytes) -> HttpRequest {
        // Unknown formats are still sent, labelled the way the player writes them
        let (mime_type, extension) = match detect_image_type(&data) {
            Some((mime, ext)) => (Some(mime.to_string()), ext),
            None => (None, "jpg"),
        };

        let form = MultipartForm::new().text(REQTYPE_FIELD, REQTYPE_UPLOAD).file(
            FILE_FIELD,
            format!("{}.{}", FILE_STEM, extension),
            mime_type,
            data,
        );

        HttpRequest::new(HttpMethod::Post, self.upload_url.clone())
            .multipart(form)
            .timeout(self.timeout)
    }
}

#[async_trait]
impl ArtworkUploader for CatboxUploader {
    async fn upload(&self, data: Bytes) -> Result<String> {
        debug!(bytes = data.len(), url = %self.upload_url, "Uploading to catbox");

        let request = self.build_request(data);
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| MetadataError::UploadFailed(e.to_string()))?;

        if !response.is_success() {
            return Err(MetadataError::UploadStatus {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).trim().to_string(),
            });
        }

        let url = String::from_utf8_lossy(&response.body).trim().to_string();
        if url.is_empty() {
            return Err(MetadataError::EmptyUploadResponse);
        }

        Ok(url)
    }
}
