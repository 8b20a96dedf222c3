//! Pooled HTTP transport shared by every operation of a client.

use std::sync::{PoisonError, RwLock};

use reqwest::Client;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{OpenfilesError, Result};

/// Owns the connection pool of one client.
///
/// Connections are established lazily: opening performs no network I/O, and an
/// unreachable host surfaces as [`OpenfilesError::Connection`] on the first request.
#[derive(Debug)]
pub struct HttpClient {
    client: RwLock<Option<Client>>,
}

impl HttpClient {
    /// Build the connection pool from a configuration.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone());

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| OpenfilesError::Config(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| OpenfilesError::Config(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client: RwLock::new(Some(client)),
        })
    }

    /// Handle onto the shared pool, or `SessionClosed` once closed.
    ///
    /// The returned client is a cheap clone sharing the same pool.
    pub fn client(&self) -> Result<Client> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(OpenfilesError::SessionClosed)
    }

    /// Release the pool. Calling it again is a no-op.
    ///
    /// Requests already in flight keep their own handle and finish normally; idle
    /// connections are dropped once the last of them completes.
    pub fn close(&self) {
        let previous = self
            .client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            debug!("HTTP session closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close() {
        let http = HttpClient::open(&ClientConfig::new("tok")).unwrap();
        assert!(!http.is_closed());
        assert!(http.client().is_ok());

        http.close();
        assert!(http.is_closed());
        assert!(matches!(http.client(), Err(OpenfilesError::SessionClosed)));

        // Second close is a no-op
        http.close();
        assert!(http.is_closed());
    }

    #[test]
    fn test_proxy_creation() {
        let config = ClientConfig::new("tok").with_proxy("http://127.0.0.1:8080");
        assert!(HttpClient::open(&config).is_ok());
    }

    #[test]
    fn test_proxy_invalid() {
        let config = ClientConfig::new("tok").with_proxy(":::::::");
        let result = HttpClient::open(&config);
        assert!(matches!(result, Err(OpenfilesError::Config(_))));
    }
}
