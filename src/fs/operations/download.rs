//! Download operations.

use std::path::{Path, PathBuf};

use futures::stream::StreamExt;
use reqwest::{Client, Method, Response};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::utils::{DEFAULT_DOWNLOAD_NAME, filename_from_headers};
use crate::api::client::{endpoints, validate_bag_id};
use crate::api::response::check_status;
use crate::error::{OpenfilesError, Result};
use crate::progress::{ProgressCallback, ProgressTracker};
use crate::session::Session;

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_dir())
}

/// Where a download ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DownloadTarget {
    /// Existing directory; the file name comes from the response.
    IntoDir(PathBuf),
    /// Explicit file path whose parent directory exists.
    File { dir: PathBuf, path: PathBuf },
}

impl DownloadTarget {
    /// Check the destination before any bytes are requested.
    async fn resolve(destination: &Path) -> Result<Self> {
        if is_dir(destination).await {
            return Ok(Self::IntoDir(destination.to_path_buf()));
        }

        if destination.file_name().is_none() {
            return Err(OpenfilesError::Destination(format!(
                "Invalid destination: {}",
                destination.display()
            )));
        }

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !is_dir(&dir).await {
            return Err(OpenfilesError::Destination(format!(
                "Parent directory does not exist: {}",
                dir.display()
            )));
        }

        Ok(Self::File {
            dir,
            path: destination.to_path_buf(),
        })
    }

    fn dir(&self) -> &Path {
        match self {
            Self::IntoDir(dir) => dir,
            Self::File { dir, .. } => dir,
        }
    }

    fn final_path(&self, suggested: Option<String>) -> PathBuf {
        match self {
            Self::IntoDir(dir) => {
                dir.join(suggested.unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string()))
            }
            Self::File { path, .. } => path.clone(),
        }
    }
}

/// Any failure once the body has started arriving is a transfer failure.
fn body_error(err: reqwest::Error) -> OpenfilesError {
    OpenfilesError::Transfer(format!("Download interrupted: {}", err))
}

fn write_error(path: &Path, err: std::io::Error) -> OpenfilesError {
    OpenfilesError::Transfer(format!("Failed to write {}: {}", path.display(), err))
}

impl Session {
    async fn open_download(&self, http: &Client, bag_id: &str) -> Result<Response> {
        let segments: Vec<&str> = endpoints::BAG_DOWNLOAD
            .iter()
            .copied()
            .chain([bag_id])
            .collect();
        let request = self.api().request(http, Method::GET, &segments);
        check_status(self.send(request).await?).await
    }

    /// Download a bag to `destination` and return the written path.
    ///
    /// Bytes go to a hidden temporary file next to the target and are renamed
    /// into place only once the whole body has arrived. On any failure,
    /// cancellation included, the temporary file is removed and no file
    /// appears at the destination.
    pub(crate) async fn download_file(
        &self,
        bag_id: &str,
        destination: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<PathBuf> {
        let http = self.http()?;
        let bag_id = validate_bag_id(bag_id)?;
        let target = DownloadTarget::resolve(destination).await?;

        let response = self.open_download(&http, bag_id).await?;

        let final_path = target.final_path(filename_from_headers(response.headers()));
        let expected = response.content_length();
        let display_name = final_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(bag_id = %bag_id, path = %final_path.display(), size = ?expected, "Downloading");

        let temp = tempfile::Builder::new()
            .prefix(".openfiles-")
            .suffix(".part")
            .tempfile_in(target.dir())
            .map_err(|e| {
                OpenfilesError::Destination(format!(
                    "Cannot write to {}: {}",
                    target.dir().display(),
                    e
                ))
            })?;
        let (file, temp_path) = temp.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut tracker = ProgressTracker::new(progress, expected.unwrap_or(0), &display_name);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(body_error)?;
            file.write_all(&chunk)
                .await
                .map_err(|e| write_error(&temp_path, e))?;
            if !tracker.advance(chunk.len() as u64) {
                debug!(bag_id = %bag_id, "Download cancelled");
                return Err(OpenfilesError::Cancelled);
            }
        }

        let received = tracker.done();
        if let Some(expected) = expected {
            if received != expected {
                return Err(OpenfilesError::Transfer(format!(
                    "Download incomplete: received {} of {} bytes",
                    received, expected
                )));
            }
        }

        file.flush().await.map_err(|e| write_error(&temp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| write_error(&temp_path, e))?;
        drop(file);

        temp_path.persist(&final_path).map_err(|e| {
            OpenfilesError::Transfer(format!(
                "Failed to move download to {}: {}",
                final_path.display(),
                e.error
            ))
        })?;

        info!(bag_id = %bag_id, path = %final_path.display(), size = received, "Download complete");
        Ok(final_path)
    }

    /// Download a bag into memory.
    pub(crate) async fn download_bytes(&self, bag_id: &str) -> Result<Vec<u8>> {
        let http = self.http()?;
        let bag_id = validate_bag_id(bag_id)?;

        let response = self.open_download(&http, bag_id).await?;

        let body = response.bytes().await.map_err(body_error)?;
        debug!(bag_id = %bag_id, size = body.len(), "Downloaded into memory");
        Ok(body.to_vec())
    }
}
