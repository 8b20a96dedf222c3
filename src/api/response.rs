//! Decoding of service responses into typed records.

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::client::transport_error;
use super::error::error_from_response;
use crate::error::{OpenfilesError, Result};

/// Pass success-class responses through; turn everything else into a classified error.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let err = error_from_response(status, &body);
    debug!(status = status.as_u16(), error = %err, "API request failed");
    Err(err)
}

/// Check the status and decode the JSON body as `T`.
///
/// `what` names the expected record in schema errors.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let response = check_status(response).await?;
    let body = response.bytes().await.map_err(transport_error)?;
    parse_json(&body, what)
}

/// Parse a success body. Unknown fields are ignored; missing or mistyped ones are schema errors.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| OpenfilesError::Schema(format!("invalid {} response: {}", what, e)))
}

/// Check the status and discard the body.
pub(crate) async fn expect_success(response: Response) -> Result<()> {
    let response = check_status(response).await?;
    // Drain so the connection can go back to the pool.
    response.bytes().await.map_err(transport_error)?;
    Ok(())
}
