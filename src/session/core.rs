//! Core session state shared by every clone of a client.

use reqwest::{Method, RequestBuilder, Response};
use tracing::debug;

use crate::api::ApiClient;
use crate::api::client::transport_error;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpClient;

/// Openfiles session.
///
/// Holds the connection pool and the request builder. Every operation first
/// takes a handle on the pool, so anything issued after [`Session::close`]
/// fails with `SessionClosed`.
#[derive(Debug)]
pub(crate) struct Session {
    /// Request builder (base URL + credentials)
    api: ApiClient,
    /// Connection pool
    http: HttpClient,
}

impl Session {
    pub(crate) fn open(config: &ClientConfig) -> Result<Self> {
        let api = ApiClient::new(&config.base_url, &config.api_token)?;
        let http = HttpClient::open(config)?;
        debug!(base_url = api.base_url(), "Session opened");
        Ok(Self { api, http })
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Pooled client, or `SessionClosed`.
    pub(crate) fn http(&self) -> Result<reqwest::Client> {
        self.http.client()
    }

    pub(crate) fn close(&self) {
        self.http.close();
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.http.is_closed()
    }

    /// Authenticated request on the shared pool.
    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let http = self.http()?;
        Ok(self.api.request(&http, method, segments))
    }

    /// Send a request, classifying transport failures.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(transport_error)
    }
}
