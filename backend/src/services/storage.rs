//! Progress image file storage
//!
//! Files are written under the configured upload directory with a random
//! name and exposed to clients as `uploads/<file>`, which the router serves
//! statically.

use crate::config::UploadConfig;
use crate::error::ApiError;
use anyhow::Context;
use diet_tracker_shared::ImageFormat;
use std::path::PathBuf;
use uuid::Uuid;

/// URL prefix under which stored files are served
pub const PUBLIC_PREFIX: &str = "uploads";

/// Local directory holding uploaded images
#[derive(Debug, Clone)]
pub struct ImageStorage {
    dir: PathBuf,
    max_file_size: usize,
}

impl ImageStorage {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            max_file_size: config.max_file_size,
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Check an upload before anything is written
    pub fn validate(
        &self,
        content_type: Option<&str>,
        file_name: Option<&str>,
        len: usize,
    ) -> Result<ImageFormat, ApiError> {
        if len == 0 {
            return Err(ApiError::Validation("File is required".to_string()));
        }

        if len > self.max_file_size {
            return Err(ApiError::PayloadTooLarge(format!(
                "File exceeds the {} byte limit",
                self.max_file_size
            )));
        }

        ImageFormat::detect(content_type, file_name)
            .map_err(|e| ApiError::Validation(e.to_string()))
    }

    /// Write the file and return its public URL
    pub async fn store(&self, format: ImageFormat, bytes: &[u8]) -> anyhow::Result<String> {
        let file_name = format!("{}.{}", Uuid::new_v4(), format.extension());

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating upload directory {}", self.dir.display()))?;
        tokio::fs::write(self.dir.join(&file_name), bytes)
            .await
            .with_context(|| format!("writing upload {file_name}"))?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Progress image stored");

        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }

    /// Delete a stored file; failures are logged and otherwise ignored
    pub async fn remove(&self, url: &str) {
        let Some(file_name) = file_name_from_url(url) else {
            tracing::warn!(url, "Refusing to remove file outside the upload directory");
            return;
        };

        if let Err(e) = tokio::fs::remove_file(self.dir.join(file_name)).await {
            tracing::warn!(url, error = %e, "Failed to remove progress image file");
        }
    }
}

/// File name of a stored URL; `None` unless it is a bare name under the public prefix
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let name = url.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;

    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);

    is_plain.then_some(name)
}
