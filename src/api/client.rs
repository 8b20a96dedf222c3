//! Authenticated request construction.

use std::fmt;

use reqwest::header::HeaderValue;
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;
use url::Url;

use crate::error::{OpenfilesError, Result};

/// Header carrying the API token.
pub const AUTH_HEADER: &str = "X-Authorization";

/// Fixed endpoint paths of the remote service.
pub(crate) mod endpoints {
    pub const USER: &[&str] = &["api", "user"];
    pub const FILES_LIST: &[&str] = &["api", "user", "files_list"];
    pub const FILE_UPLOAD: &[&str] = &["api", "files", "upload"];
    pub const FOLDER_UPLOAD: &[&str] = &["api", "folders", "upload"];
    pub const BAG: &[&str] = &["api", "bag"];
    pub const BAG_DOWNLOAD: &[&str] = &["api", "bag", "download"];
    pub const BAG_ADD: &[&str] = &["api", "bag", "add_by_id"];
}

/// API token, kept out of `Debug` output and marked sensitive on the wire.
#[derive(Clone)]
pub struct ApiToken(HeaderValue);

impl ApiToken {
    pub fn new(token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(OpenfilesError::Config("API token is empty".to_string()));
        }
        let mut value = HeaderValue::from_str(token).map_err(|_| {
            OpenfilesError::Config("API token contains invalid header characters".to_string())
        })?;
        value.set_sensitive(true);
        Ok(Self(value))
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

/// Builds requests against the service root with credentials attached.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    token: ApiToken,
}

impl ApiClient {
    /// Create a request builder for `base_url`.
    ///
    /// The URL must use `http` or `https`; trailing slashes are ignored.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            token: ApiToken::new(token)?,
        })
    }

    /// Normalized service root, without trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Resolve an endpoint. Each segment is percent-encoded on its own.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start an authenticated request.
    pub fn request(&self, http: &Client, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(method = %method, path = url.path(), "API request");
        http.request(method, url)
            .header(AUTH_HEADER, self.token.0.clone())
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(OpenfilesError::Config("Base URL cannot be empty".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| OpenfilesError::Config(format!("Invalid base URL {}: {}", trimmed, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(OpenfilesError::Config(
            "Base URL must start with http:// or https://".to_string(),
        ));
    }
    Ok(url)
}

/// Classify a transport-level failure reported by `reqwest`.
///
/// Only body stream failures are `Transfer`; a connection dropped or reset
/// while sending a request is `Connection`, so it stays retryable.
pub(crate) fn transport_error(err: reqwest::Error) -> OpenfilesError {
    if err.is_connect() || err.is_timeout() {
        OpenfilesError::Connection(err.to_string())
    } else if err.is_body() {
        OpenfilesError::Transfer(err.to_string())
    } else if err.is_decode() {
        OpenfilesError::Schema(err.to_string())
    } else if err.is_builder() {
        OpenfilesError::InvalidArgument(err.to_string())
    } else {
        OpenfilesError::Connection(err.to_string())
    }
}

/// Reject empty bag ids before anything is sent.
pub(crate) fn validate_bag_id(bag_id: &str) -> Result<&str> {
    let bag_id = bag_id.trim();
    if bag_id.is_empty() {
        return Err(OpenfilesError::InvalidArgument(
            "bag id cannot be empty".to_string(),
        ));
    }
    Ok(bag_id)
}
