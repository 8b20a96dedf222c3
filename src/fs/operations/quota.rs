//! Account quota.

use reqwest::Method;

use crate::api::client::endpoints;
use crate::api::response::decode_json;
use crate::error::Result;
use crate::fs::records::UserInfo;
use crate::session::Session;

impl Session {
    /// Get account identifier and storage figures.
    pub(crate) async fn user_info(&self) -> Result<UserInfo> {
        let request = self.request(Method::GET, endpoints::USER)?;
        let response = self.send(request).await?;
        decode_json(response, "user info").await
    }
}
