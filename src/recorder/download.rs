use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

use super::chunk::{DownloadReceipt, RecordedBlob};

/// Default file name offered for a finished recording
pub const DEFAULT_FILE_NAME: &str = "recording.webm";

/// Download boundary: hands a finished recording to the user, once
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    /// Deliver `blob` under `file_name`
    ///
    /// `chunk_count` is informational and ends up in the receipt.
    async fn deliver(
        &self,
        blob: RecordedBlob,
        file_name: &str,
        chunk_count: usize,
    ) -> Result<DownloadReceipt>;
}

/// Saves recordings into a downloads directory
///
/// A taken name gets a ` (n)` suffix before the extension, the way a browser
/// names repeated downloads (`recording (1).webm`).
pub struct FileDownloader {
    dir: PathBuf,
}

impl FileDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn available_path(&self, file_name: &str) -> Result<PathBuf> {
        let candidate = self.dir.join(file_name);
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }

        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());
        let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

        let mut n = 1;
        loop {
            let name = match &extension {
                Some(ext) => format!("{} ({}).{}", stem, n, ext),
                None => format!("{} ({})", stem, n),
            };
            let candidate = self.dir.join(name);
            if !tokio::fs::try_exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

#[async_trait::async_trait]
impl Downloader for FileDownloader {
    async fn deliver(
        &self,
        blob: RecordedBlob,
        file_name: &str,
        chunk_count: usize,
    ) -> Result<DownloadReceipt> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create downloads directory: {:?}", self.dir))?;

        let path = self.available_path(file_name).await?;

        tokio::fs::write(&path, &blob.data)
            .await
            .with_context(|| format!("Failed to write recording: {:?}", path))?;

        info!(
            "Saved recording to {} ({} bytes, {})",
            path.display(),
            blob.len(),
            blob.mime_type
        );

        Ok(DownloadReceipt {
            location: path.display().to_string(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.to_string()),
            mime_type: blob.mime_type,
            size_bytes: blob.data.len(),
            chunk_count,
            delivered_at: Utc::now(),
        })
    }
}
