//! File listing.

use reqwest::Method;
use tracing::debug;

use crate::api::client::endpoints;
use crate::api::response::decode_json;
use crate::error::Result;
use crate::fs::records::FileRecord;
use crate::session::Session;

impl Session {
    /// List stored files in the order the service returns them.
    pub(crate) async fn list_files(&self) -> Result<Vec<FileRecord>> {
        let request = self.request(Method::GET, endpoints::FILES_LIST)?;
        let response = self.send(request).await?;
        let files: Vec<FileRecord> = decode_json(response, "file list").await?;
        debug!(count = files.len(), "Listed files");
        Ok(files)
    }
}
