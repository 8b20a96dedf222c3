//! Upload operations.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::stream::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Method};
use tokio::fs::File;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use super::archive::archive_to_tempfile;
use super::utils::file_name_of;
use crate::api::client::{endpoints, transport_error};
use crate::api::response::decode_json;
use crate::error::{OpenfilesError, Result};
use crate::fs::records::{BagResponse, UploadResult};
use crate::progress::{ProgressCallback, ProgressTracker};
use crate::session::Session;

/// Read size for streamed request bodies.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

const FILE_MIME: &str = "application/octet-stream";
const ARCHIVE_MIME: &str = "application/zip";

/// What is being sent: advertised name and exact length.
struct UploadSource<'a> {
    endpoint: &'a [&'a str],
    file_name: &'a str,
    size: u64,
    mime: &'static str,
}

/// Request body streamed from a reader, usually an open file.
///
/// The flags record why the stream stopped early so that a failed send can be
/// reported as a cancellation or a local read failure instead of a network error.
struct FileBody {
    body: Body,
    cancelled: Arc<AtomicBool>,
    read_failed: Arc<AtomicBool>,
}

impl FileBody {
    fn new<R>(reader: R, total: u64, file_name: &str, progress: Option<ProgressCallback>) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let read_failed = Arc::new(AtomicBool::new(false));
        let tracker = Mutex::new(ProgressTracker::new(progress, total, file_name));

        let stream_cancelled = cancelled.clone();
        let stream_read_failed = read_failed.clone();
        let stream = ReaderStream::with_capacity(reader, UPLOAD_CHUNK_SIZE).map(move |chunk| {
            let chunk = chunk.inspect_err(|_| stream_read_failed.store(true, Ordering::SeqCst))?;
            let keep_going = tracker
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .advance(chunk.len() as u64);
            if !keep_going {
                stream_cancelled.store(true, Ordering::SeqCst);
                return Err(io::Error::new(io::ErrorKind::Interrupted, "upload cancelled"));
            }
            Ok(chunk)
        });

        Self {
            body: Body::wrap_stream(stream),
            cancelled,
            read_failed,
        }
    }

    fn classify(cancelled: &AtomicBool, read_failed: &AtomicBool, err: reqwest::Error) -> OpenfilesError {
        if cancelled.load(Ordering::SeqCst) {
            OpenfilesError::Cancelled
        } else if read_failed.load(Ordering::SeqCst) {
            OpenfilesError::Transfer(format!("Failed reading upload source: {}", err))
        } else {
            transport_error(err)
        }
    }
}

async fn open_source(path: &Path) -> Result<File> {
    File::open(path).await.map_err(|e| {
        OpenfilesError::Transfer(format!("Failed to open {}: {}", path.display(), e))
    })
}

impl Session {
    /// Upload a single file.
    ///
    /// The file is streamed; it is never loaded into memory as a whole.
    pub(crate) async fn upload_file(
        &self,
        path: &Path,
        description: Option<&str>,
        progress: Option<ProgressCallback>,
    ) -> Result<UploadResult> {
        let http = self.http()?;

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|_| OpenfilesError::SourceNotFound(path.to_path_buf()))?;
        if !metadata.is_file() {
            return Err(OpenfilesError::SourceNotFound(path.to_path_buf()));
        }
        let file_name = file_name_of(path)?;
        let file = open_source(path).await?;

        let source = UploadSource {
            endpoint: endpoints::FILE_UPLOAD,
            file_name: &file_name,
            size: metadata.len(),
            mime: FILE_MIME,
        };
        self.upload_stream(&http, source, file, description, progress)
            .await
    }

    /// Package a directory as `<folder name>.zip` and upload it.
    ///
    /// The archive is built on a blocking thread into a temporary file that is
    /// removed once the upload finishes, fails or is cancelled.
    pub(crate) async fn upload_folder(
        &self,
        path: &Path,
        description: Option<&str>,
        progress: Option<ProgressCallback>,
    ) -> Result<UploadResult> {
        let http = self.http()?;

        let folder = tokio::fs::canonicalize(path)
            .await
            .map_err(|_| OpenfilesError::SourceNotFound(path.to_path_buf()))?;
        let metadata = tokio::fs::metadata(&folder)
            .await
            .map_err(|_| OpenfilesError::SourceNotFound(path.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(OpenfilesError::SourceNotFound(path.to_path_buf()));
        }

        let folder_name = folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "folder".to_string());
        let archive_name = format!("{}.zip", folder_name);

        debug!(folder = %folder.display(), "Packaging folder");
        let archive = tokio::task::spawn_blocking(move || archive_to_tempfile(&folder))
            .await
            .map_err(|e| OpenfilesError::Transfer(format!("Archive task failed: {}", e)))??;

        let size = archive
            .as_file()
            .metadata()
            .map_err(|e| OpenfilesError::Transfer(format!("Failed to stat archive: {}", e)))?
            .len();

        let file = open_source(archive.path()).await?;

        let source = UploadSource {
            endpoint: endpoints::FOLDER_UPLOAD,
            file_name: &archive_name,
            size,
            mime: ARCHIVE_MIME,
        };
        let result = self
            .upload_stream(&http, source, file, description, progress)
            .await;

        drop(archive);
        result
    }

    async fn upload_stream<R>(
        &self,
        http: &Client,
        source: UploadSource<'_>,
        reader: R,
        description: Option<&str>,
        progress: Option<ProgressCallback>,
    ) -> Result<UploadResult>
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        let FileBody {
            body,
            cancelled,
            read_failed,
        } = FileBody::new(reader, source.size, source.file_name, progress);

        let part = Part::stream_with_length(body, source.size)
            .file_name(source.file_name.to_string())
            .mime_str(source.mime)
            .map_err(|e| OpenfilesError::InvalidArgument(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("description", description.unwrap_or_default().to_string());

        debug!(file = source.file_name, size = source.size, "Uploading");
        let response = self
            .api()
            .request(http, Method::POST, source.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| FileBody::classify(&cancelled, &read_failed, e))?;

        let bag: BagResponse = decode_json(response, "upload").await?;
        if bag.bag_id.trim().is_empty() {
            return Err(OpenfilesError::Schema(
                "invalid upload response: empty bag_id".to_string(),
            ));
        }

        info!(
            bag_id = %bag.bag_id,
            file = source.file_name,
            size = source.size,
            "Upload complete"
        );

        Ok(UploadResult {
            bag_id: bag.bag_id,
            size: source.size,
            description: description.map(str::to_string),
        })
    }
}
