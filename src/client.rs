//! Public client handle.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::fs::{FileRecord, UploadResult, UserInfo};
use crate::progress::ProgressCallback;
use crate::session::Session;

/// Handle to an Openfiles account.
///
/// Cloning is cheap and every clone shares one connection pool, so the same
/// client can drive many operations at once from different tasks. Operations
/// are independent: nothing orders concurrent calls and nothing is retried.
/// Callers that need "upload, then delete" semantics must await one before
/// starting the other.
///
/// Opening a client does not contact the service. An unreachable host shows up
/// as a `Connection` error on the first operation.
///
/// # Example
/// ```no_run
/// use openfiles::OpenfilesClient;
///
/// # async fn example() -> openfiles::Result<()> {
/// let client = OpenfilesClient::new("my-token")?;
///
/// let result = client.upload_file("hello.txt", Some("greeting")).await?;
/// for file in client.list_files().await? {
///     println!("{} {} ({} bytes)", file.bag_id, file.filename, file.size);
/// }
/// client.download_file(&result.bag_id, "copy.txt").await?;
///
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenfilesClient {
    session: Arc<Session>,
}

/// Closes the wrapped client when dropped.
struct CloseOnDrop(OpenfilesClient);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

impl OpenfilesClient {
    /// Open a client with explicit settings.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let session = Session::open(&config)?;
        Ok(Self {
            session: Arc::new(session),
        })
    }

    /// Open a client for the default endpoint.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::open(ClientConfig::new(api_token))
    }

    /// Open a client configured from `OPENFILES_API_TOKEN` and `OPENFILES_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::open(ClientConfig::from_env()?)
    }

    /// Run `f` with a fresh client and close it afterwards.
    ///
    /// The client is closed on every exit path: when `f` returns an error, when
    /// it panics, and when the returned future is dropped before completion.
    /// Clones that escape the closure are closed too, since they share the session.
    ///
    /// # Example
    /// ```no_run
    /// use openfiles::{ClientConfig, OpenfilesClient};
    ///
    /// # async fn example() -> openfiles::Result<()> {
    /// let files = OpenfilesClient::scoped(ClientConfig::from_env()?, |client| async move {
    ///     client.list_files().await
    /// })
    /// .await?;
    /// println!("{} files", files.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scoped<F, Fut, T>(config: ClientConfig, f: F) -> Result<T>
    where
        F: FnOnce(OpenfilesClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let client = Self::open(config)?;
        let guard = CloseOnDrop(client.clone());
        let result = f(client).await;
        drop(guard);
        result
    }

    /// Release pooled connections. Idempotent.
    ///
    /// Affects every clone. Operations started afterwards fail with
    /// `SessionClosed`; transfers already in flight run to completion.
    pub fn close(&self) {
        self.session.close();
    }

    /// Whether [`OpenfilesClient::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Service root this client talks to.
    pub fn base_url(&self) -> &str {
        self.session.api().base_url()
    }

    /// Get account id and storage figures.
    pub async fn get_user_info(&self) -> Result<UserInfo> {
        self.session.user_info().await
    }

    /// List stored files, in the order the service returns them.
    pub async fn list_files(&self) -> Result<Vec<FileRecord>> {
        self.session.list_files().await
    }

    /// Upload a single file.
    ///
    /// The file is streamed from disk. A missing path or a directory fails with
    /// `SourceNotFound` before any request is sent.
    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        path: P,
        description: Option<&str>,
    ) -> Result<UploadResult> {
        self.session
            .upload_file(path.as_ref(), description, None)
            .await
    }

    /// Upload a single file, reporting progress as bytes are sent.
    ///
    /// Returning `false` from the callback aborts the request with `Cancelled`.
    pub async fn upload_file_with_progress<P: AsRef<Path>>(
        &self,
        path: P,
        description: Option<&str>,
        progress: ProgressCallback,
    ) -> Result<UploadResult> {
        self.session
            .upload_file(path.as_ref(), description, Some(progress))
            .await
    }

    /// Package a directory as `<name>.zip` and upload the archive.
    ///
    /// Archives are deterministic: the same unchanged tree always produces the
    /// same bytes (see [`crate::write_archive`]).
    pub async fn upload_folder<P: AsRef<Path>>(
        &self,
        path: P,
        description: Option<&str>,
    ) -> Result<UploadResult> {
        self.session
            .upload_folder(path.as_ref(), description, None)
            .await
    }

    /// Like [`OpenfilesClient::upload_folder`], reporting progress against the archive size.
    pub async fn upload_folder_with_progress<P: AsRef<Path>>(
        &self,
        path: P,
        description: Option<&str>,
        progress: ProgressCallback,
    ) -> Result<UploadResult> {
        self.session
            .upload_folder(path.as_ref(), description, Some(progress))
            .await
    }

    /// Download a bag and return the path written.
    ///
    /// `destination` is either a file path whose parent directory exists, or an
    /// existing directory. For a directory, the file name comes from the
    /// response's `Content-Disposition` header (falling back to
    /// `downloaded_file`). An unusable destination fails with `Destination`
    /// before anything is requested. The target only appears once the whole
    /// body has been written.
    pub async fn download_file<P: AsRef<Path>>(
        &self,
        bag_id: &str,
        destination: P,
    ) -> Result<PathBuf> {
        self.session
            .download_file(bag_id, destination.as_ref(), None)
            .await
    }

    /// Like [`OpenfilesClient::download_file`], reporting progress per received chunk.
    pub async fn download_file_with_progress<P: AsRef<Path>>(
        &self,
        bag_id: &str,
        destination: P,
        progress: ProgressCallback,
    ) -> Result<PathBuf> {
        self.session
            .download_file(bag_id, destination.as_ref(), Some(progress))
            .await
    }

    /// Download a bag into memory.
    pub async fn download_bytes(&self, bag_id: &str) -> Result<Vec<u8>> {
        self.session.download_bytes(bag_id).await
    }

    /// Register an existing bag with this account.
    pub async fn add_by_bag_id(&self, bag_id: &str) -> Result<()> {
        self.session.add_bag(bag_id).await
    }

    /// Delete a stored file by bag id.
    pub async fn delete_file(&self, bag_id: &str) -> Result<()> {
        self.session.delete_bag(bag_id).await
    }
}
