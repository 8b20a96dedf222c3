//! # openfiles
//!
//! Async Rust client for the Openfiles storage service.
//!
//! ## Features
//!
//! - **Account**: query the account id and storage quota.
//! - **Files**:
//!   - List stored files with their bag ids, sizes and descriptions.
//!   - Delete files and register existing bags by id.
//! - **File Transfers**:
//!   - Streamed uploads; files are never loaded into memory as a whole.
//!   - Folder uploads, packaged on the fly as a deterministic ZIP archive.
//!   - Downloads written to a temporary file and moved into place when complete.
//!   - Progress tracking with custom callbacks (return `false` to cancel).
//! - **Concurrency**: one client (and any of its clones) shares a single
//!   connection pool, and any number of operations can run on it at once.
//!
//! Every stored file is addressed by its *bag id*, the content identifier the
//! service assigns at upload time.
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use openfiles::OpenfilesClient;
//!
//! # async fn example() -> openfiles::Result<()> {
//! // Token from OPENFILES_API_TOKEN
//! let client = OpenfilesClient::from_env()?;
//!
//! let info = client.get_user_info().await?;
//! println!("{:.1}% used", info.usage_percent());
//!
//! // Upload a file and a folder
//! let file = client.upload_file("report.pdf", Some("Q3 report")).await?;
//! let folder = client.upload_folder("photos", None).await?;
//! println!("{} / {}", file.bag_id, folder.bag_id);
//!
//! // Download into an existing directory, named after the stored file
//! let path = client.download_file(&file.bag_id, "downloads").await?;
//! println!("saved to {}", path.display());
//!
//! client.delete_file(&folder.bag_id).await?;
//! client.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Scoped Client
//!
//! ```no_run
//! use openfiles::{ClientConfig, OpenfilesClient};
//!
//! # async fn example() -> openfiles::Result<()> {
//! let config = ClientConfig::new("my-token").with_base_url("http://localhost:8000");
//!
//! // The client is closed when the closure finishes, whether it succeeds or not.
//! let count = OpenfilesClient::scoped(config, |client| async move {
//!     Ok(client.list_files().await?.len())
//! })
//! .await?;
//! println!("{} files", count);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod progress;
mod session;

// Re-export commonly used types
pub use client::OpenfilesClient;
pub use config::ClientConfig;
pub use error::{OpenfilesError, Result};
pub use fs::{FileRecord, UploadResult, UserInfo, write_archive};
pub use progress::{ProgressCallback, TransferProgress};
